//! API route handlers

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uplift::{Arm, PredictionResponse, UpliftError};

use crate::{ApiError, AppState, MAX_BODY_BYTES};

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - can both models score?
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let service = state.service();
    match service.probe() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "version": env!("CARGO_PKG_VERSION"),
                "model": service.model_id()
            })),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "version": env!("CARGO_PKG_VERSION"),
                    "model": service.model_id(),
                    "detail": err.to_string()
                })),
            )
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub features: Vec<String>,
    pub n_features: usize,
    pub treated: String,
    pub control: String,
}

/// Metadata of the serving bundle.
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    let service = state.service();
    let schema = service.schema();
    Json(ModelInfo {
        model: service.model_id().to_string(),
        features: schema.names().to_vec(),
        n_features: schema.len(),
        treated: service.model(Arm::Treated).kind().to_string(),
        control: service.model(Arm::Control).kind().to_string(),
    })
}

/// Score a batch of instances with both models.
///
/// The body is taken as raw bytes so that every structural problem surfaces
/// as a typed validation error rather than a generic extractor rejection.
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let body = body.map_err(body_error)?;
    tracing::debug!(bytes = body.len(), "predict request");
    // Scoring is CPU-bound; keep it off the async workers.
    let response = tokio::task::spawn_blocking(move || state.service().predict(&body))
        .await
        .map_err(|e| {
            let reason = if e.is_panic() {
                "scoring task panicked".to_string()
            } else {
                format!("scoring task failed: {}", e)
            };
            UpliftError::ScoringAborted { reason }
        })??;
    Ok(Json(response))
}

fn body_error(rejection: BytesRejection) -> UpliftError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UpliftError::PayloadTooLarge {
            limit: MAX_BODY_BYTES,
        }
    } else {
        UpliftError::MalformedPayload {
            reason: rejection.body_text(),
        }
    }
}
