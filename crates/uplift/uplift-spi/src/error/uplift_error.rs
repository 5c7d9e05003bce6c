//! Per-request error taxonomy.

use serde_json::Value;
use thiserror::Error;

use super::ScoringError;
use crate::model::Arm;

/// Errors a single prediction request can end in.
///
/// Client-caused variants map to 4xx responses and carry enough detail
/// (index, field name) for the caller to correct the payload. Server-caused
/// variants map to 5xx.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpliftError {
    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("Missing or invalid field '{field}': expected an array of instances")]
    MissingField { field: String },

    #[error("Empty batch: 'instances' must contain at least one instance")]
    EmptyBatch,

    #[error("Batch too large: limit {limit}, got {actual}")]
    BatchTooLarge { limit: usize, actual: usize },

    #[error("Request body too large: limit {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Instance {index} must be an object, got {found}")]
    InvalidInstanceType { index: usize, found: String },

    #[error("Instance {index} is missing features: {}", missing.join(", "))]
    MissingFeature { index: usize, missing: Vec<String> },

    #[error("Instance {index} has a non-numeric value for '{key}': {value}")]
    InvalidFeatureValue {
        index: usize,
        key: String,
        value: Value,
    },

    #[error("Scoring failed for instance {index} on the {arm} model: {source}")]
    ScoringFailure {
        index: usize,
        arm: Arm,
        source: ScoringError,
    },

    /// The scoring task stopped without a result, e.g. a model panicked.
    #[error("Scoring aborted: {reason}")]
    ScoringAborted { reason: String },

    #[error("Internal assembly error: {0}")]
    InternalAssembly(String),
}

impl UpliftError {
    /// Stable kind string reported in the `error` field of responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPayload { .. } => "MalformedPayload",
            Self::MissingField { .. } => "MissingField",
            Self::EmptyBatch => "EmptyBatch",
            Self::BatchTooLarge { .. } => "BatchTooLarge",
            Self::PayloadTooLarge { .. } => "PayloadTooLarge",
            Self::InvalidInstanceType { .. } => "InvalidInstanceType",
            Self::MissingFeature { .. } => "MissingFeature",
            Self::InvalidFeatureValue { .. } => "InvalidFeatureValue",
            Self::ScoringFailure { .. } | Self::ScoringAborted { .. } => "ScoringFailure",
            Self::InternalAssembly(_) => "InternalAssemblyError",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedPayload { .. } => 400,
            Self::BatchTooLarge { .. } | Self::PayloadTooLarge { .. } => 413,
            Self::MissingField { .. }
            | Self::EmptyBatch
            | Self::InvalidInstanceType { .. }
            | Self::MissingFeature { .. }
            | Self::InvalidFeatureValue { .. } => 422,
            Self::ScoringFailure { .. } | Self::ScoringAborted { .. } | Self::InternalAssembly(_) => {
                500
            }
        }
    }

    /// Whether the caller caused this error.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Index of the offending instance, when the error is tied to one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::InvalidInstanceType { index, .. }
            | Self::MissingFeature { index, .. }
            | Self::InvalidFeatureValue { index, .. }
            | Self::ScoringFailure { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result type for uplift inference operations.
pub type Result<T> = std::result::Result<T, UpliftError>;
