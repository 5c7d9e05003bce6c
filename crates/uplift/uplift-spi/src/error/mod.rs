//! Error types for uplift inference.
//!
//! This module contains the per-request error taxonomy, model-internal
//! scoring errors, bundle loading errors and the Result alias.

mod bundle_error;
mod scoring_error;
mod uplift_error;

pub use bundle_error::BundleError;
pub use scoring_error::ScoringError;
pub use uplift_error::{Result, UpliftError};
