//! Mapping of inference errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uplift::{ErrorBody, UpliftError};

/// An [`UpliftError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub UpliftError);

impl From<UpliftError> for ApiError {
    fn from(err: UpliftError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), error = %self.0, "prediction failed");
        } else {
            tracing::debug!(kind = self.0.kind(), error = %self.0, "rejected request");
        }
        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}
