//! Gradient-boosted decision trees over encoded feature vectors.
//!
//! The artifact carries per-tree node arrays exported from the training
//! run. The split rule is `x[feature] <= threshold` goes left; the unseen
//! sentinel `-1.0` is just a value and routes left past any non-negative
//! threshold. Stage outputs are margins, summed and squashed through the
//! logistic link.

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::model::{Model, sigmoid};

/// One node of a regression tree, addressed by index into the tree's array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split: `x[feature] <= threshold` goes left, else right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node carrying this stage's margin contribution.
    Leaf { value: f64 },
}

/// A single stage tree. The root sits at index 0 and every split's children
/// sit strictly after it, so traversal always terminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Walks the tree for one vector. Relies on `validate` having checked
    /// every index at load time.
    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ArtifactError> {
        if self.nodes.is_empty() {
            return Err(ArtifactError::InvalidModel(format!("tree {tree} is empty")));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            else {
                continue;
            };
            if *feature >= n_features {
                return Err(ArtifactError::InvalidModel(format!(
                    "tree {tree} node {index}: feature {feature} out of range"
                )));
            }
            for child in [*left, *right] {
                if child >= self.nodes.len() {
                    return Err(ArtifactError::InvalidModel(format!(
                        "tree {tree} node {index}: child {child} out of range"
                    )));
                }
                // Children strictly after the parent rules out cycles.
                if child <= index {
                    return Err(ArtifactError::InvalidModel(format!(
                        "tree {tree} node {index}: child {child} does not advance"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Additive ensemble: `base_score + learning_rate * sum(tree(x))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    n_features: usize,
    /// Prior log-odds of the positive class from the training data.
    base_score: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
    /// Trained impurity importances, one per feature. Absent in exports
    /// that predate importance capture.
    #[serde(default)]
    feature_importances: Option<Vec<f64>>,
}

impl GradientBoostedTrees {
    pub fn new(
        n_features: usize,
        base_score: f64,
        learning_rate: f64,
        trees: Vec<Tree>,
        feature_importances: Option<Vec<f64>>,
    ) -> Self {
        Self {
            n_features,
            base_score,
            learning_rate,
            trees,
            feature_importances,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.n_features == 0 {
            return Err(ArtifactError::InvalidModel(
                "model declares zero features".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::InvalidModel(
                "ensemble has no trees".to_string(),
            ));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, self.n_features)?;
        }
        if let Some(scores) = &self.feature_importances {
            if scores.len() != self.n_features {
                return Err(ArtifactError::ImportanceLength {
                    scores: scores.len(),
                    features: self.n_features,
                });
            }
        }
        Ok(())
    }

    fn raw_score(&self, features: &[f64]) -> f64 {
        let staged: f64 = self.trees.iter().map(|tree| tree.evaluate(features)).sum();
        self.base_score + self.learning_rate * staged
    }
}

impl Model for GradientBoostedTrees {
    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.raw_score(features))
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }
}
