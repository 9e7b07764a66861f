//! End-to-end training job: split, fit, evaluate, save.

use linfa::error::Error as LinfaError;
use ndarray::ShapeError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use model_service::{
    ArtifactError, ForestClassifier, InferenceError, ModelBundle, ModelMetadata,
    DEFAULT_MODEL_PATH,
};

use crate::dataset::{self, ClassDataset, TARGET_NAMES};
use crate::forest::{self, ForestParams};
use crate::split::stratified_split;

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("Invalid training options: {0}")]
    InvalidOptions(String),

    #[error("Failed to split the dataset: {0}")]
    Split(#[from] ShapeError),

    #[error("Failed to fit the forest: {0}")]
    Fit(#[from] LinfaError),

    #[error("Failed to evaluate the forest: {0}")]
    Evaluate(#[from] InferenceError),

    #[error("Failed to save model bundle: {0}")]
    Save(#[from] ArtifactError),
}

/// Knobs for a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    pub output: PathBuf,
    pub n_estimators: usize,
    pub seed: u64,
    pub test_size: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_MODEL_PATH),
            n_estimators: 100,
            seed: 42,
            test_size: 0.2,
        }
    }
}

impl TrainingOptions {
    fn validate(&self) -> Result<(), TrainError> {
        if self.n_estimators == 0 {
            return Err(TrainError::InvalidOptions(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainError::InvalidOptions(format!(
                "test_size must be between 0 and 1, got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
    pub output: PathBuf,
}

/// Train on the Iris dataset and write the bundle.
pub fn run_training(options: &TrainingOptions) -> Result<TrainingReport, TrainError> {
    options.validate()?;
    info!(n_estimators = options.n_estimators, seed = options.seed, "Starting training");

    let data = dataset::iris();
    let (bundle, report) = train_on(&data, options)?;

    bundle.save(&report.output)?;
    info!(path = %report.output.display(), "Model saved");

    Ok(report)
}

/// Fit and evaluate without touching the filesystem.
pub fn train_on(
    data: &ClassDataset,
    options: &TrainingOptions,
) -> Result<(ModelBundle, TrainingReport), TrainError> {
    options.validate()?;
    let mut rng = StdRng::seed_from_u64(options.seed);

    let (train, test) = stratified_split(data, options.test_size, &mut rng)?;
    let train_size = train.records().nrows();
    let test_size = test.records().nrows();
    info!(train_size, test_size, "Data split");

    let params = ForestParams {
        n_estimators: options.n_estimators,
        ..ForestParams::default()
    };
    let model = forest::fit_forest(&train, &params, &mut rng)?;
    let accuracy = accuracy(&model, &test)?;
    info!(accuracy, "Model trained");

    let mut metadata = ModelMetadata::new(accuracy, "RandomForestClassifier");
    let feature_names: Vec<Value> = data
        .feature_names()
        .iter()
        .map(|name| Value::from(name.as_str()))
        .collect();
    metadata
        .extra
        .insert("feature_names".to_string(), Value::Array(feature_names));

    let target_names = TARGET_NAMES.iter().map(|name| name.to_string()).collect();
    let bundle = ModelBundle::new(model, target_names, metadata);
    let report = TrainingReport {
        train_size,
        test_size,
        accuracy,
        output: options.output.clone(),
    };

    Ok((bundle, report))
}

/// Fraction of `test` rows the forest labels correctly.
fn accuracy(model: &ForestClassifier, test: &ClassDataset) -> Result<f64, InferenceError> {
    let total = test.records().nrows();
    if total == 0 {
        return Ok(0.0);
    }

    let mut correct = 0;
    for (row, &label) in test.records().outer_iter().zip(test.targets().iter()) {
        if model.predict_row(&row.to_vec())? == label {
            correct += 1;
        }
    }
    Ok(correct as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_options() {
        let zero_trees = TrainingOptions {
            n_estimators: 0,
            ..TrainingOptions::default()
        };
        assert!(matches!(
            run_training(&zero_trees),
            Err(TrainError::InvalidOptions(_))
        ));

        let all_test = TrainingOptions {
            test_size: 1.0,
            ..TrainingOptions::default()
        };
        assert!(matches!(
            run_training(&all_test),
            Err(TrainError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_accuracy_counts_matching_rows() {
        let data: ClassDataset = linfa::DatasetBase::new(
            ndarray::array![[0.0], [1.0], [10.0], [11.0]],
            ndarray::array![0_usize, 0, 1, 1],
        );
        let model = forest::fit_forest(
            &data,
            &ForestParams {
                n_estimators: 1,
                bootstrap_proportion: 4.0,
                ..ForestParams::default()
            },
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        let relabeled: ClassDataset = linfa::DatasetBase::new(
            data.records().clone(),
            ndarray::array![0_usize, 0, 1, 0],
        );
        assert_eq!(accuracy(&model, &data).unwrap(), 1.0);
        assert_eq!(accuracy(&model, &relabeled).unwrap(), 0.75);
    }

    #[test]
    fn test_defaults_match_artifact_path() {
        let options = TrainingOptions::default();
        assert_eq!(options.output, PathBuf::from("model/model.pkl"));
        assert_eq!(options.n_estimators, 100);
    }
}
