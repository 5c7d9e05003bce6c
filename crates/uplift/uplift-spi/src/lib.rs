//! Uplift Service Provider Interface
//!
//! Defines the scoring contract, the error taxonomy and the data model shared
//! by every layer of the uplift inference stack.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::Scorer;
pub use error::{BundleError, Result, ScoringError, UpliftError};
pub use model::{Arm, FeatureVector, Instance, PredictionResponse, PredictionResult};
