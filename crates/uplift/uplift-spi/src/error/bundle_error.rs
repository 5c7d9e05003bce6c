//! Model bundle loading errors. These are fatal at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Arm;

/// Errors raised while loading or validating a model bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Failed to read bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid {arm} model: {reason}")]
    InvalidModel { arm: Arm, reason: String },
}
