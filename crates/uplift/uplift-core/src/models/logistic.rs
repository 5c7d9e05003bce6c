//! Logistic regression scorer.

use serde::{Deserialize, Serialize};
use uplift_spi::{Scorer, ScoringError};

use super::sigmoid;

/// Linear model with a logistic link: `p = sigmoid(intercept + w . x)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "expected {} coefficients, got {}",
                n_features,
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err("coefficients must be finite".to_string());
        }
        Ok(())
    }

    /// Raw margin before the sigmoid.
    pub fn margin(&self, features: &[f64]) -> Result<f64, ScoringError> {
        if features.len() != self.coefficients.len() {
            return Err(ScoringError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.intercept + dot)
    }
}

impl Scorer for LogisticModel {
    fn score(&self, features: &[f64]) -> Result<f64, ScoringError> {
        let margin = self.margin(features)?;
        if !margin.is_finite() {
            return Err(ScoringError::NonFinite { value: margin });
        }
        Ok(sigmoid(margin))
    }

    fn kind(&self) -> &str {
        "logistic"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_margin_is_half() {
        let model = LogisticModel::new(0.0, vec![1.0, -1.0]);
        let p = model.score(&[2.0, 2.0]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        let model = LogisticModel::new(-1.0, vec![0.5, 0.25]);
        // margin = -1 + 1.0 + 0.5 = 0.5
        let p = model.score(&[2.0, 2.0]).unwrap();
        let expected = 1.0 / (1.0 + (-0.5f64).exp());
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = LogisticModel::new(0.0, vec![1.0; 12]);
        let err = model.score(&[1.0; 11]).unwrap_err();
        assert_eq!(
            err,
            ScoringError::DimensionMismatch {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn test_overflowing_margin_is_non_finite() {
        let model = LogisticModel::new(0.0, vec![1.0, 1.0]);
        let err = model.score(&[f64::MAX, f64::MAX]).unwrap_err();
        assert_eq!(
            err,
            ScoringError::NonFinite {
                value: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_validate() {
        let model = LogisticModel::new(0.0, vec![1.0, f64::NAN]);
        assert!(model.validate(2).is_err());
        assert!(LogisticModel::new(0.0, vec![1.0]).validate(1).is_ok());
    }

    #[test]
    fn test_metadata() {
        let model = LogisticModel::new(0.0, vec![0.0; 5]);
        assert_eq!(model.kind(), "logistic");
        assert_eq!(model.n_features(), Some(5));
    }
}
