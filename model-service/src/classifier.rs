//! Tree-based classifiers stored inside the model artifact.
//!
//! Trees are fitted `linfa-trees` models. A split sends a row left when
//! `row[feature] < threshold`. The wrappers record the input width the trees
//! were fitted on: a fitted tree indexes rows without bounds checks, so the
//! width is checked here before any tree sees a row.

use linfa::prelude::Predict;
use linfa_trees::DecisionTree;
use ndarray::{Array1, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ArtifactError, InferenceError};

/// A fitted CART tree over `f64` features with class-index labels.
pub type FittedTree = DecisionTree<f64, usize>;

/// A single decision tree.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TreeClassifier {
    /// Number of features each input row must have
    pub n_features: usize,

    pub tree: FittedTree,
}

impl TreeClassifier {
    pub fn new(n_features: usize, tree: FittedTree) -> Self {
        Self { n_features, tree }
    }

    /// Check that every split reads an existing feature and has both children.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        check_tree(&self.tree, self.n_features).map_err(ArtifactError::Invalid)
    }

    pub fn predict_row(&self, row: &[f64]) -> Result<usize, InferenceError> {
        majority_vote(std::slice::from_ref(&self.tree), self.n_features, row)
    }
}

/// Bagged ensemble of decision trees, predicting by majority vote.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ForestClassifier {
    pub n_features: usize,
    pub trees: Vec<FittedTree>,
}

impl ForestClassifier {
    pub fn new(n_features: usize, trees: Vec<FittedTree>) -> Self {
        Self { n_features, trees }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        for (index, tree) in self.trees.iter().enumerate() {
            check_tree(tree, self.n_features)
                .map_err(|e| ArtifactError::Invalid(format!("tree {index}: {e}")))?;
        }
        Ok(())
    }

    /// Majority vote over all trees. Ties go to the lowest class index.
    pub fn predict_row(&self, row: &[f64]) -> Result<usize, InferenceError> {
        majority_vote(&self.trees, self.n_features, row)
    }
}

/// Any classifier the service knows how to run.
///
/// Serialized with a `kind` tag, e.g. `{"kind": "random_forest", ...}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    DecisionTree(TreeClassifier),
    RandomForest(ForestClassifier),
}

impl Classifier {
    pub const fn n_features(&self) -> usize {
        match self {
            Self::DecisionTree(tree) => tree.n_features,
            Self::RandomForest(forest) => forest.n_features,
        }
    }

    /// Human-readable model family, used in bundle metadata.
    pub const fn model_type(&self) -> &'static str {
        match self {
            Self::DecisionTree(_) => "DecisionTreeClassifier",
            Self::RandomForest(_) => "RandomForestClassifier",
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Self::DecisionTree(tree) => tree.validate(),
            Self::RandomForest(forest) => forest.validate(),
        }
    }

    /// Predict the class index for a single row.
    pub fn predict(&self, row: &[f64]) -> Result<usize, InferenceError> {
        match self {
            Self::DecisionTree(tree) => tree.predict_row(row),
            Self::RandomForest(forest) => forest.predict_row(row),
        }
    }
}

impl From<TreeClassifier> for Classifier {
    fn from(tree: TreeClassifier) -> Self {
        Self::DecisionTree(tree)
    }
}

impl From<ForestClassifier> for Classifier {
    fn from(forest: ForestClassifier) -> Self {
        Self::RandomForest(forest)
    }
}

fn check_tree(tree: &FittedTree, n_features: usize) -> Result<(), String> {
    for node in tree.iter_nodes().filter(|node| !node.is_leaf()) {
        let (feature, threshold, _) = node.split();
        if feature >= n_features {
            return Err(format!(
                "split on feature {feature} but the model has {n_features} features"
            ));
        }
        if threshold.is_nan() {
            return Err(format!("split on feature {feature} has a NaN threshold"));
        }
        if node.children().iter().any(|child| child.is_none()) {
            return Err(format!("split on feature {feature} is missing a child"));
        }
    }
    Ok(())
}

fn majority_vote(
    trees: &[FittedTree],
    n_features: usize,
    row: &[f64],
) -> Result<usize, InferenceError> {
    if row.len() != n_features {
        return Err(InferenceError::FeatureMismatch {
            expected: n_features,
            actual: row.len(),
        });
    }

    let records = ArrayView1::from(row).insert_axis(Axis(0));
    let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
    for tree in trees {
        let predicted: Array1<usize> = tree.predict(&records);
        for class in predicted.iter() {
            *votes.entry(*class).or_default() += 1;
        }
    }

    // Classes iterate in ascending order, so the first maximum wins a tie.
    let mut best: Option<(usize, usize)> = None;
    for (class, count) in votes {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((class, count));
        }
    }

    best.map(|(class, _)| class)
        .ok_or(InferenceError::EmptyEnsemble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfa::prelude::Fit;
    use linfa::Dataset;
    use ndarray::{array, Array2};

    /// Fully grown tree over two samples of each species.
    fn iris_tree() -> TreeClassifier {
        let records = array![
            [5.1, 3.5, 1.4, 0.2],
            [4.9, 3.0, 1.4, 0.2],
            [7.0, 3.2, 4.7, 1.4],
            [6.4, 3.2, 4.5, 1.5],
            [6.3, 3.3, 6.0, 2.5],
            [5.8, 2.7, 5.1, 1.9],
        ];
        let targets = array![0_usize, 0, 1, 1, 2, 2];
        let tree = DecisionTree::<f64, usize>::params()
            .fit(&Dataset::new(records, targets))
            .unwrap();
        TreeClassifier::new(4, tree)
    }

    /// Single-leaf tree that always answers `class`.
    fn constant_tree(class: usize) -> FittedTree {
        DecisionTree::<f64, usize>::params()
            .fit(&Dataset::new(Array2::<f64>::zeros((2, 4)), array![class, class]))
            .unwrap()
    }

    #[test]
    fn test_tree_predicts_training_rows() {
        let tree = iris_tree();
        assert_eq!(tree.predict_row(&[5.1, 3.5, 1.4, 0.2]), Ok(0));
        assert_eq!(tree.predict_row(&[6.4, 3.2, 4.5, 1.5]), Ok(1));
        assert_eq!(tree.predict_row(&[6.3, 3.3, 6.0, 2.5]), Ok(2));
    }

    #[test]
    fn test_feature_mismatch() {
        let tree = iris_tree();
        assert_eq!(
            tree.predict_row(&[5.1, 3.5, 1.4]),
            Err(InferenceError::FeatureMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        // Only the second column separates the classes.
        let records = array![[0.0, 1.0], [0.0, 2.0]];
        let tree = DecisionTree::<f64, usize>::params()
            .fit(&Dataset::new(records, array![0_usize, 1]))
            .unwrap();

        assert!(TreeClassifier::new(2, tree.clone()).validate().is_ok());
        assert!(TreeClassifier::new(1, tree).validate().is_err());
        assert!(iris_tree().validate().is_ok());
    }

    #[test]
    fn test_forest_majority_vote() {
        let forest = ForestClassifier::new(
            4,
            vec![constant_tree(2), iris_tree().tree, constant_tree(2)],
        );
        assert_eq!(forest.predict_row(&[5.1, 3.5, 1.4, 0.2]), Ok(2));
    }

    #[test]
    fn test_forest_tie_goes_to_lowest_class() {
        let forest = ForestClassifier::new(4, vec![constant_tree(2), constant_tree(1)]);
        assert_eq!(forest.predict_row(&[0.0; 4]), Ok(1));
    }

    #[test]
    fn test_empty_forest_fails_inference() {
        let forest = ForestClassifier::new(4, vec![]);
        assert!(forest.validate().is_ok());
        assert_eq!(
            forest.predict_row(&[0.0; 4]),
            Err(InferenceError::EmptyEnsemble)
        );
    }

    #[test]
    fn test_forest_rejects_tree_wider_than_forest() {
        let records = array![[0.0, 1.0], [0.0, 2.0]];
        let tree = DecisionTree::<f64, usize>::params()
            .fit(&Dataset::new(records, array![0_usize, 1]))
            .unwrap();
        let forest = ForestClassifier::new(1, vec![constant_tree(0), tree]);

        let err = forest.validate().unwrap_err();
        assert!(err.to_string().contains("tree 1"));
    }

    #[test]
    fn test_classifier_serde_round_trip() {
        let classifier = Classifier::from(iris_tree());
        let json = serde_json::to_value(&classifier).unwrap();
        assert_eq!(json["kind"], "decision_tree");
        assert_eq!(json["n_features"], 4);

        let back: Classifier = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&back).unwrap(), json);
        assert_eq!(back.model_type(), "DecisionTreeClassifier");
        assert_eq!(back.predict(&[5.8, 2.7, 5.1, 1.9]), Ok(2));
    }
}
