//! Response assembly.

use uplift_spi::{PredictionResponse, PredictionResult};

/// Package scored results with the model identifier. `n` is the result count.
pub fn assemble(predictions: Vec<PredictionResult>, model: impl Into<String>) -> PredictionResponse {
    PredictionResponse {
        n: predictions.len(),
        predictions,
        model: model.into(),
    }
}
