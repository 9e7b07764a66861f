//! Model Trainer - offline producer of the classifier artifact
//!
//! Trains a bagged forest of `linfa-trees` decision trees on the Iris data
//! from `linfa-datasets`, measures held-out accuracy and writes a structured
//! bundle that `model-service` can load.

pub mod dataset;
pub mod forest;
pub mod split;
pub mod training;

pub use forest::{fit_forest, ForestParams};
pub use training::{run_training, train_on, TrainError, TrainingOptions, TrainingReport};
