//! Scoring model trait definition.

use crate::error::ScoringError;

/// A trained binary-outcome model.
///
/// Given an ordered feature vector, returns the probability of the positive
/// outcome. Implementations must be deterministic and side-effect free; the
/// service shares one instance across all concurrent requests.
pub trait Scorer: Send + Sync {
    /// Score one feature vector.
    fn score(&self, features: &[f64]) -> Result<f64, ScoringError>;

    /// Short name of the model family, reported by model metadata endpoints.
    fn kind(&self) -> &str {
        "custom"
    }

    /// Number of features the model was trained on, if it knows.
    fn n_features(&self) -> Option<usize> {
        None
    }
}
