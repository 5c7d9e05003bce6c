//! Uplift Inference Facade
//!
//! Unified re-exports for the uplift inference stack.
//!
//! This facade provides a single entry point to all inference functionality:
//! - `Scorer` trait, errors and data model from SPI
//! - `FeatureSchema`, configuration and wire error bodies from API
//! - Validator, batch scorer, assembler, models and bundle loader from Core

// Re-export everything from SPI
pub use uplift_spi::*;

// Re-export everything from API
pub use uplift_api::*;

// Re-export everything from Core
pub use uplift_core::*;
