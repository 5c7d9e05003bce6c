//! Prediction result and response types.

use serde::{Deserialize, Serialize};

/// Per-instance output of the two-model estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Outcome probability under treatment.
    pub p_treated: f64,
    /// Outcome probability without treatment.
    pub p_control: f64,
    /// `p_treated - p_control`. May be negative.
    pub uplift: f64,
}

impl PredictionResult {
    /// Build a result, deriving uplift from the two probabilities.
    pub fn new(p_treated: f64, p_control: f64) -> Self {
        Self {
            p_treated,
            p_control,
            uplift: p_treated - p_control,
        }
    }
}

/// Wire response for a scored batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// One result per instance, in request order.
    pub predictions: Vec<PredictionResult>,
    /// Identifier of the serving model bundle.
    pub model: String,
    /// Number of predictions.
    pub n: usize,
}
