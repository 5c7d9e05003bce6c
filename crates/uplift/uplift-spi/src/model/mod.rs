//! Data models for uplift inference.
//!
//! This module contains data structures used throughout the inference pipeline.

mod arm;
mod feature_vector;
mod instance;
mod prediction;

pub use arm::Arm;
pub use feature_vector::FeatureVector;
pub use instance::Instance;
pub use prediction::{PredictionResponse, PredictionResult};
