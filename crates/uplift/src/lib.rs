//! # uplift
//!
//! Inference for two-model ("treated" / "control") uplift estimators.
//!
//! A request carries a batch of feature mappings. Each is validated against the
//! [`FeatureSchema`], projected into a [`FeatureVector`] in schema order and
//! scored by both models; the response carries `p_treated`, `p_control` and
//! their difference per instance.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uplift::prelude::*;
//!
//! let schema = FeatureSchema::numbered(2).unwrap();
//! let treated = Arc::new(LogisticModel::new(0.0, vec![0.5, 0.0]));
//! let control = Arc::new(LogisticModel::new(0.0, vec![0.0, 0.0]));
//! let bundle = ModelBundle::new("demo", schema, treated, control).unwrap();
//! let service = UpliftService::new(bundle, &ServiceConfig::default());
//!
//! let response = service
//!     .predict(br#"{"instances": [{"f0": 2.0, "f1": 1.0}]}"#)
//!     .unwrap();
//! assert_eq!(response.n, 1);
//! assert!(response.predictions[0].uplift > 0.0);
//! ```

pub use uplift_facade::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use uplift_facade::models::{LogisticModel, ModelSpec, TreeEnsembleModel};
    pub use uplift_facade::{
        assemble, load_bundle, BatchScorer, FeatureSchema, ModelBundle, PredictionResponse,
        PredictionResult, RequestValidator, Scorer, ScoringConfig, ServiceConfig, UpliftError,
        UpliftService,
    };
}
