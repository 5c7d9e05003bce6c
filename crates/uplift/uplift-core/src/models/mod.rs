//! Scoring model implementations.
//!
//! Both families produce a raw margin and map it to a probability with the
//! logistic sigmoid.

mod logistic;
mod tree;

pub use logistic::LogisticModel;
pub use tree::{Node, Tree, TreeEnsembleModel};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uplift_spi::Scorer;

/// Serialized model description, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsembleModel),
}

impl ModelSpec {
    /// Check the model against a feature count.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        match self {
            ModelSpec::Logistic(model) => model.validate(n_features),
            ModelSpec::TreeEnsemble(model) => model.validate(n_features),
        }
    }

    pub fn into_scorer(self) -> Arc<dyn Scorer> {
        match self {
            ModelSpec::Logistic(model) => Arc::new(model),
            ModelSpec::TreeEnsemble(model) => Arc::new(model),
        }
    }
}

/// Numerically stable logistic sigmoid.
/// Clamps input to [-500, 500] to prevent overflow.
#[inline]
pub(crate) fn sigmoid(x: f64) -> f64 {
    let clamped = x.clamp(-500.0, 500.0);
    if clamped >= 0.0 {
        1.0 / (1.0 + (-clamped).exp())
    } else {
        let e = clamped.exp();
        e / (1.0 + e)
    }
}
