//! End-to-end inference pipeline: validate, score, assemble.

use std::sync::Arc;

use uplift_api::{FeatureSchema, ServiceConfig};
use uplift_spi::{Arm, Instance, PredictionResponse, Result, Scorer, UpliftError};

use crate::assembler::assemble;
use crate::bundle::ModelBundle;
use crate::scorer::BatchScorer;
use crate::validator::RequestValidator;

/// Process-wide inference state.
///
/// Built once before traffic is accepted and shared read-only across
/// requests; cloning only bumps reference counts.
#[derive(Debug, Clone)]
pub struct UpliftService {
    model_id: Arc<str>,
    validator: RequestValidator,
    scorer: BatchScorer,
}

impl UpliftService {
    /// Build the service from a loaded bundle and configuration.
    pub fn new(bundle: ModelBundle, config: &ServiceConfig) -> Self {
        let model_id = config
            .model_id
            .clone()
            .unwrap_or_else(|| bundle.model_id.clone());
        let validator = RequestValidator::new(Arc::clone(&bundle.schema))
            .with_max_batch_size(config.max_batch_size);
        let scorer = BatchScorer::new(bundle.schema, bundle.treated, bundle.control)
            .with_config(config.scoring.clone());
        Self {
            model_id: Arc::from(model_id),
            validator,
            scorer,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.scorer.schema()
    }

    pub fn model(&self, arm: Arm) -> &dyn Scorer {
        self.scorer.model(arm)
    }

    /// Handle a raw request body.
    pub fn predict(&self, payload: &[u8]) -> Result<PredictionResponse> {
        let instances = self.validator.validate(payload)?;
        self.predict_instances(&instances)
    }

    /// Handle a parsed request document.
    pub fn predict_value(&self, payload: &serde_json::Value) -> Result<PredictionResponse> {
        let instances = self.validator.validate_value(payload)?;
        self.predict_instances(&instances)
    }

    /// Score validated instances and assemble the response.
    pub fn predict_instances(&self, instances: &[Instance]) -> Result<PredictionResponse> {
        tracing::debug!(batch = instances.len(), "scoring batch");
        let results = self.scorer.score_batch(instances)?;
        let response = assemble(results, self.model_id.to_string());
        if response.n != instances.len() {
            tracing::error!(
                expected = instances.len(),
                actual = response.n,
                "prediction count does not match instance count"
            );
            return Err(UpliftError::InternalAssembly(format!(
                "assembled {} predictions for {} instances",
                response.n,
                instances.len()
            )));
        }
        Ok(response)
    }

    /// Score an all-zeros vector through both models.
    ///
    /// Used as a readiness check.
    pub fn probe(&self) -> Result<()> {
        let zeros = vec![0.0; self.schema().len()];
        self.scorer.score_vector(0, &zeros).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uplift_spi::ScoringError;

    struct Constant(f64);

    impl Scorer for Constant {
        fn score(&self, _features: &[f64]) -> std::result::Result<f64, ScoringError> {
            Ok(self.0)
        }
    }

    fn service(config: &ServiceConfig) -> UpliftService {
        let bundle = ModelBundle::new(
            "stub",
            FeatureSchema::numbered(2).unwrap(),
            Arc::new(Constant(0.7)),
            Arc::new(Constant(0.2)),
        )
        .unwrap();
        UpliftService::new(bundle, config)
    }

    #[test]
    fn test_predict_from_bytes() {
        let svc = service(&ServiceConfig::default());
        let response = svc
            .predict(br#"{"instances": [{"f0": 1, "f1": 2}, {"f0": 3, "f1": 4}]}"#)
            .unwrap();
        assert_eq!(response.n, 2);
        assert_eq!(response.model, "stub");
        assert!((response.predictions[1].uplift - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_model_id_override() {
        let config = ServiceConfig {
            model_id: Some("override-id".to_string()),
            ..ServiceConfig::default()
        };
        let svc = service(&config);
        assert_eq!(svc.model_id(), "override-id");
        let response = svc
            .predict_value(&serde_json::json!({"instances": [{"f0": 0, "f1": 0}]}))
            .unwrap();
        assert_eq!(response.model, "override-id");
    }

    #[test]
    fn test_validation_short_circuits() {
        let svc = service(&ServiceConfig::default());
        let err = svc.predict(br#"{"instances": []}"#).unwrap_err();
        assert_eq!(err, UpliftError::EmptyBatch);
    }

    #[test]
    fn test_batch_limit_from_config() {
        let config = ServiceConfig {
            max_batch_size: Some(1),
            ..ServiceConfig::default()
        };
        let err = service(&config)
            .predict(br#"{"instances": [{"f0": 1, "f1": 2}, {"f0": 3, "f1": 4}]}"#)
            .unwrap_err();
        assert_eq!(err.kind(), "BatchTooLarge");
    }

    #[test]
    fn test_probe() {
        assert!(service(&ServiceConfig::default()).probe().is_ok());
    }
}
