//! Random forest training: bagged `linfa-trees` CART trees with Gini
//! impurity.
//!
//! Every tree is fitted on its own bootstrap sample of the training rows and
//! grown until its leaves are pure, unless a depth cap is set.

use linfa::error::Error as LinfaError;
use linfa::prelude::Fit;
use linfa_trees::{DecisionTree, SplitQuality};
use rand::Rng;
use tracing::debug;

use model_service::{FittedTree, ForestClassifier};

use crate::dataset::ClassDataset;

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// Depth limit per tree; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Bootstrap sample size as a fraction of the training rows
    pub bootstrap_proportion: f64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            bootstrap_proportion: 1.0,
        }
    }
}

/// Fit `params.n_estimators` trees, each on a bootstrap sample of `train`.
pub fn fit_forest<R: Rng>(
    train: &ClassDataset,
    params: &ForestParams,
    rng: &mut R,
) -> Result<ForestClassifier, LinfaError> {
    let tree_params = DecisionTree::<f64, usize>::params()
        .split_quality(SplitQuality::Gini)
        .max_depth(params.max_depth);

    let n_rows = train.records().nrows();
    let sample_size = ((n_rows as f64) * params.bootstrap_proportion).ceil() as usize;

    let trees = train
        .bootstrap_samples(sample_size.max(1), rng)
        .take(params.n_estimators)
        .enumerate()
        .map(|(index, sample)| {
            let fitted: Result<FittedTree, LinfaError> = tree_params.fit(&sample);
            if let Ok(tree) = &fitted {
                debug!(tree = index, depth = tree.max_depth(), leaves = tree.num_leaves(), "Tree grown");
            }
            fitted
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForestClassifier::new(train.records().ncols(), trees))
}
