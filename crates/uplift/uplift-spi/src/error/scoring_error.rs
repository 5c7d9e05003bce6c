//! Errors raised by a scoring model for a single feature vector.

use thiserror::Error;

/// Model-internal scoring errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("Dimension mismatch: model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Non-finite model output: {value}")]
    NonFinite { value: f64 },

    #[error("Malformed model: {0}")]
    MalformedModel(String),
}
