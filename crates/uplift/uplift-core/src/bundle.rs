//! Model bundle loading.
//!
//! A bundle is one JSON artifact holding the model identifier, the feature
//! schema and both arms of the estimator:
//!
//! ```json
//! {
//!   "model_id": "t-learner-v3",
//!   "features": ["f0", "f1"],
//!   "treated": {"kind": "logistic", "intercept": -1.2, "coefficients": [0.3, 0.1]},
//!   "control": {"kind": "tree_ensemble", "base_score": 0.0, "n_features": 2, "trees": []}
//! }
//! ```
//!
//! Every failure here is fatal at startup.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uplift_api::FeatureSchema;
use uplift_spi::{Arm, BundleError, Scorer};

use crate::models::ModelSpec;

fn default_model_id() -> String {
    "t-learner".to_string()
}

/// On-disk form of a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleFile {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    pub features: Vec<String>,
    pub treated: ModelSpec,
    pub control: ModelSpec,
}

/// Loaded, validated, read-only serving state.
#[derive(Clone)]
pub struct ModelBundle {
    pub model_id: String,
    pub schema: Arc<FeatureSchema>,
    pub treated: Arc<dyn Scorer>,
    pub control: Arc<dyn Scorer>,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("model_id", &self.model_id)
            .field("features", &self.schema.len())
            .field("treated", &self.treated.kind())
            .field("control", &self.control.kind())
            .finish()
    }
}

impl ModelBundle {
    /// Assemble a bundle from already constructed models.
    ///
    /// Models that report a feature count must agree with the schema.
    pub fn new(
        model_id: impl Into<String>,
        schema: FeatureSchema,
        treated: Arc<dyn Scorer>,
        control: Arc<dyn Scorer>,
    ) -> Result<Self, BundleError> {
        for (arm, model) in [(Arm::Treated, &treated), (Arm::Control, &control)] {
            if let Some(n) = model.n_features() {
                if n != schema.len() {
                    return Err(BundleError::InvalidModel {
                        arm,
                        reason: format!(
                            "model expects {} features, schema has {}",
                            n,
                            schema.len()
                        ),
                    });
                }
            }
        }

        Ok(Self {
            model_id: model_id.into(),
            schema: Arc::new(schema),
            treated,
            control,
        })
    }

    /// Validate a parsed bundle file and build its scorers.
    pub fn from_file(file: BundleFile) -> Result<Self, BundleError> {
        if file.model_id.trim().is_empty() {
            return Err(BundleError::InvalidSchema(
                "model_id must not be empty".to_string(),
            ));
        }
        let schema = FeatureSchema::new(file.features)?;
        for (arm, spec) in [(Arm::Treated, &file.treated), (Arm::Control, &file.control)] {
            spec.validate(schema.len())
                .map_err(|reason| BundleError::InvalidModel { arm, reason })?;
        }
        Self::new(
            file.model_id,
            schema,
            file.treated.into_scorer(),
            file.control.into_scorer(),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, BundleError> {
        let file: BundleFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Replace the bundle's identifier.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

/// Read and validate a bundle from disk.
pub fn load_bundle(path: impl AsRef<Path>) -> Result<ModelBundle, BundleError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bundle = ModelBundle::from_json_str(&json)?;
    tracing::info!(
        path = %path.display(),
        model = %bundle.model_id,
        features = bundle.schema.len(),
        treated = bundle.treated.kind(),
        control = bundle.control.kind(),
        "loaded model bundle"
    );
    Ok(bundle)
}
