//! Uplift Inference API
//!
//! Feature schema, configuration types and wire error bodies.

mod config;
mod error_body;
mod schema;

// Re-export SPI types
pub use uplift_spi::{
    Arm, BundleError, FeatureVector, Instance, PredictionResponse, PredictionResult, Result,
    Scorer, ScoringError, UpliftError,
};

pub use config::{ScoringConfig, ServiceConfig};
pub use error_body::ErrorBody;
pub use schema::FeatureSchema;
