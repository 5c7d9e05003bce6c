//! Gradient-boosted tree ensemble scorer.
//!
//! Trees are stored as flat node arrays with the root at index 0. A split
//! sends a sample left when `value < threshold`; NaN follows `default_left`.
//! The ensemble margin is `base_score` plus the sum of the reached leaves.

use serde::{Deserialize, Serialize};
use uplift_spi::{Scorer, ScoringError};

use super::sigmoid;

/// A single tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        value: f64,
    },
}

/// One regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Tree consisting of a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self::new(vec![Node::Leaf { value }])
    }

    /// Children must point forward, which rules out cycles.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but only {} features exist",
                            i, feature, n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", i));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", i));
                    }
                }
            }
        }
        Ok(())
    }

    /// Value of the leaf reached by `features`.
    pub fn predict(&self, features: &[f64]) -> Result<f64, ScoringError> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                ScoringError::MalformedModel(format!("node {} out of range", idx))
            })?;
            match *node {
                Node::Leaf { value } => return Ok(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = *features.get(feature).ok_or_else(|| {
                        ScoringError::MalformedModel(format!(
                            "feature {} out of range for {} inputs",
                            feature,
                            features.len()
                        ))
                    })?;
                    let go_left = if value.is_nan() {
                        default_left
                    } else {
                        value < threshold
                    };
                    idx = if go_left { left } else { right };
                }
            }
        }
        Err(ScoringError::MalformedModel(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }
}

/// Additive tree ensemble with a logistic link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    #[serde(default)]
    pub base_score: f64,
    pub n_features: usize,
    pub trees: Vec<Tree>,
}

impl TreeEnsembleModel {
    pub fn new(base_score: f64, n_features: usize, trees: Vec<Tree>) -> Self {
        Self {
            base_score,
            n_features,
            trees,
        }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.n_features != n_features {
            return Err(format!(
                "trained on {} features, schema has {}",
                self.n_features, n_features
            ));
        }
        if !self.base_score.is_finite() {
            return Err("base_score must be finite".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|reason| format!("tree {}: {}", t, reason))?;
        }
        Ok(())
    }

    /// Raw margin before the sigmoid.
    pub fn margin(&self, features: &[f64]) -> Result<f64, ScoringError> {
        if features.len() != self.n_features {
            return Err(ScoringError::DimensionMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let mut sum = self.base_score;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(sum)
    }
}

impl Scorer for TreeEnsembleModel {
    fn score(&self, features: &[f64]) -> Result<f64, ScoringError> {
        let margin = self.margin(features)?;
        if !margin.is_finite() {
            return Err(ScoringError::NonFinite { value: margin });
        }
        Ok(sigmoid(margin))
    }

    fn kind(&self) -> &str {
        "tree_ensemble"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }
}
