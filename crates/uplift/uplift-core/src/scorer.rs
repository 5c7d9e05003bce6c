//! Batch scoring against the treated and control models.

use std::sync::Arc;

use rayon::prelude::*;
use uplift_api::{FeatureSchema, ScoringConfig};
use uplift_spi::{Arm, Instance, PredictionResult, Result, Scorer, ScoringError, UpliftError};

/// Scores validated instances with both models of a T-Learner.
///
/// Instances are independent, so a batch may be scored on the rayon pool.
/// Results are collected by index, so output order always equals input order.
/// Any model failure aborts the whole batch.
#[derive(Clone)]
pub struct BatchScorer {
    schema: Arc<FeatureSchema>,
    treated: Arc<dyn Scorer>,
    control: Arc<dyn Scorer>,
    config: ScoringConfig,
}

impl std::fmt::Debug for BatchScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScorer")
            .field("schema", &self.schema)
            .field("treated", &self.treated.kind())
            .field("control", &self.control.kind())
            .field("config", &self.config)
            .finish()
    }
}

impl BatchScorer {
    pub fn new(
        schema: Arc<FeatureSchema>,
        treated: Arc<dyn Scorer>,
        control: Arc<dyn Scorer>,
    ) -> Self {
        Self {
            schema,
            treated,
            control,
            config: ScoringConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self, arm: Arm) -> &dyn Scorer {
        match arm {
            Arm::Treated => self.treated.as_ref(),
            Arm::Control => self.control.as_ref(),
        }
    }

    /// Score a batch. `result[i]` corresponds to `instances[i]`.
    pub fn score_batch(&self, instances: &[Instance]) -> Result<Vec<PredictionResult>> {
        if self.config.use_parallel(instances.len()) {
            let scored: Vec<Result<PredictionResult>> = instances
                .par_iter()
                .enumerate()
                .map(|(index, instance)| self.score_instance(index, instance))
                .collect();
            // Report the lowest failing index, as sequential scoring would.
            scored.into_iter().collect()
        } else {
            instances
                .iter()
                .enumerate()
                .map(|(index, instance)| self.score_instance(index, instance))
                .collect()
        }
    }

    /// Score one instance; `index` is only used for error reporting.
    pub fn score_instance(&self, index: usize, instance: &Instance) -> Result<PredictionResult> {
        let vector = self
            .schema
            .project(instance)
            .map_err(|missing| UpliftError::MissingFeature { index, missing })?;
        self.score_vector(index, vector.as_slice())
    }

    /// Score an already projected feature vector.
    pub fn score_vector(&self, index: usize, features: &[f64]) -> Result<PredictionResult> {
        let p_treated = self.probability(Arm::Treated, index, features)?;
        let p_control = self.probability(Arm::Control, index, features)?;
        Ok(PredictionResult::new(p_treated, p_control))
    }

    fn probability(&self, arm: Arm, index: usize, features: &[f64]) -> Result<f64> {
        let raw = self
            .model(arm)
            .score(features)
            .map_err(|source| UpliftError::ScoringFailure { index, arm, source })?;
        guard_probability(raw).map_err(|source| {
            tracing::error!(index, %arm, "model returned NaN");
            UpliftError::ScoringFailure { index, arm, source }
        })
    }
}

/// Clamp a model output into [0, 1]. NaN cannot be clamped and is an error.
fn guard_probability(raw: f64) -> std::result::Result<f64, ScoringError> {
    if raw.is_nan() {
        return Err(ScoringError::NonFinite { value: raw });
    }
    if !(0.0..=1.0).contains(&raw) {
        tracing::warn!(raw, "model output outside [0, 1], clamping");
        return Ok(raw.clamp(0.0, 1.0));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Constant(f64);

    impl Scorer for Constant {
        fn score(&self, _features: &[f64]) -> std::result::Result<f64, ScoringError> {
            Ok(self.0)
        }
    }

    /// Returns the mean of the features, scaled into [0, 1].
    struct Mean;

    impl Scorer for Mean {
        fn score(&self, features: &[f64]) -> std::result::Result<f64, ScoringError> {
            Ok(features.iter().sum::<f64>() / (features.len() as f64 * 100.0))
        }
    }

    /// Fails on vectors whose first feature is negative.
    struct FailsOnNegative;

    impl Scorer for FailsOnNegative {
        fn score(&self, features: &[f64]) -> std::result::Result<f64, ScoringError> {
            if features[0] < 0.0 {
                Err(ScoringError::MalformedModel("negative input".to_string()))
            } else {
                Ok(0.5)
            }
        }
    }

    struct Counting(AtomicUsize);

    impl Scorer for Counting {
        fn score(&self, _features: &[f64]) -> std::result::Result<f64, ScoringError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(0.5)
        }
    }

    fn schema() -> Arc<FeatureSchema> {
        Arc::new(FeatureSchema::numbered(3).unwrap())
    }

    fn instance(values: [f64; 3]) -> Instance {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("f{}", i), *v))
            .collect()
    }

    #[test]
    fn test_constant_models() {
        let scorer = BatchScorer::new(schema(), Arc::new(Constant(0.12)), Arc::new(Constant(0.08)));
        let results = scorer.score_batch(&[instance([1.0, 2.0, 3.0])]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].p_treated, 0.12);
        assert_eq!(results[0].p_control, 0.08);
        assert!((results[0].uplift - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_order_preserved() {
        let scorer = BatchScorer::new(schema(), Arc::new(Mean), Arc::new(Constant(0.0)))
            .with_config(ScoringConfig {
                parallel: true,
                min_parallel_batch: 2,
            });
        let batch: Vec<Instance> = (0..200)
            .map(|i| instance([i as f64 * 0.1, i as f64 * 0.2, i as f64 * 0.3]))
            .collect();
        let results = scorer.score_batch(&batch).unwrap();
        assert_eq!(results.len(), batch.len());
        for (i, result) in results.iter().enumerate() {
            let expected = (i as f64 * 0.1 + i as f64 * 0.2 + i as f64 * 0.3) / 300.0;
            assert_eq!(result.p_treated, expected);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let parallel = BatchScorer::new(schema(), Arc::new(Mean), Arc::new(Mean)).with_config(
            ScoringConfig {
                parallel: true,
                min_parallel_batch: 2,
            },
        );
        let sequential = parallel.clone().with_config(ScoringConfig::sequential());
        let batch: Vec<Instance> = (0..500)
            .map(|i| instance([(i % 7) as f64, (i % 11) as f64, (i % 13) as f64]))
            .collect();
        assert_eq!(
            parallel.score_batch(&batch).unwrap(),
            sequential.score_batch(&batch).unwrap()
        );
    }

    #[test]
    fn test_out_of_range_outputs_clamped() {
        let scorer = BatchScorer::new(schema(), Arc::new(Constant(1.3)), Arc::new(Constant(-0.2)));
        let result = scorer.score_instance(0, &instance([0.0; 3])).unwrap();
        assert_eq!(result.p_treated, 1.0);
        assert_eq!(result.p_control, 0.0);
        assert_eq!(result.uplift, 1.0);
    }

    #[test]
    fn test_nan_output_is_scoring_failure() {
        let scorer = BatchScorer::new(
            schema(),
            Arc::new(Constant(0.5)),
            Arc::new(Constant(f64::NAN)),
        );
        let err = scorer.score_batch(&[instance([0.0; 3])]).unwrap_err();
        match err {
            UpliftError::ScoringFailure { index, arm, source } => {
                assert_eq!(index, 0);
                assert_eq!(arm, Arm::Control);
                assert!(matches!(source, ScoringError::NonFinite { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_model_error_fails_whole_batch() {
        let scorer = BatchScorer::new(
            schema(),
            Arc::new(FailsOnNegative),
            Arc::new(Constant(0.1)),
        )
        .with_config(ScoringConfig::sequential());
        let batch = vec![
            instance([1.0, 0.0, 0.0]),
            instance([-1.0, 0.0, 0.0]),
            instance([2.0, 0.0, 0.0]),
        ];
        let err = scorer.score_batch(&batch).unwrap_err();
        assert_eq!(err.kind(), "ScoringFailure");
        assert_eq!(err.index(), Some(1));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_parallel_failure_reports_lowest_index() {
        let scorer = BatchScorer::new(
            schema(),
            Arc::new(FailsOnNegative),
            Arc::new(Constant(0.1)),
        )
        .with_config(ScoringConfig {
            parallel: true,
            min_parallel_batch: 2,
        });
        let batch: Vec<Instance> = (0..100)
            .map(|i| {
                let first = if i == 40 || i == 80 { -1.0 } else { 1.0 };
                instance([first, 0.0, 0.0])
            })
            .collect();
        let err = scorer.score_batch(&batch).unwrap_err();
        assert_eq!(err.index(), Some(40));
    }

    #[test]
    fn test_unvalidated_instance_reports_missing_feature() {
        let scorer = BatchScorer::new(schema(), Arc::new(Constant(0.1)), Arc::new(Constant(0.1)));
        let partial: Instance = [("f0", 1.0)].into_iter().collect();
        let err = scorer.score_instance(4, &partial).unwrap_err();
        assert_eq!(
            err,
            UpliftError::MissingFeature {
                index: 4,
                missing: vec!["f1".to_string(), "f2".to_string()]
            }
        );
    }

    #[test]
    fn test_each_model_called_once_per_instance() {
        let treated = Arc::new(Counting(AtomicUsize::new(0)));
        let control = Arc::new(Counting(AtomicUsize::new(0)));
        let scorer = BatchScorer::new(schema(), treated.clone(), control.clone());
        let batch: Vec<Instance> = (0..10).map(|_| instance([0.0; 3])).collect();
        scorer.score_batch(&batch).unwrap();
        assert_eq!(treated.0.load(Ordering::SeqCst), 10);
        assert_eq!(control.0.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_guard_passes_valid_probabilities() {
        for p in [0.0, 0.25, 1.0] {
            assert_eq!(guard_probability(p).unwrap(), p);
        }
    }
}
