//! Iris reference data (Fisher, 1936): 150 samples, 50 per species.

use linfa::Dataset;
use ndarray::Ix1;

/// Feature rows with class-index targets.
pub type ClassDataset = Dataset<f64, usize, Ix1>;

/// Species names, indexed by class.
pub const TARGET_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// The Iris dataset, features in sepal length, sepal width, petal length,
/// petal width order.
pub fn iris() -> ClassDataset {
    linfa_datasets::iris()
}
