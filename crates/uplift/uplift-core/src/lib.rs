//! Uplift Inference Core
//!
//! Request validation, batch scoring, response assembly, the bundled scoring
//! models and the bundle loader.

mod assembler;
mod bundle;
mod scorer;
mod service;
mod validator;

pub mod models;

pub use assembler::assemble;
pub use bundle::{load_bundle, BundleFile, ModelBundle};
pub use scorer::BatchScorer;
pub use service::UpliftService;
pub use validator::RequestValidator;
