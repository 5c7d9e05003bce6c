//! # uplift-server
//!
//! REST API server for two-model uplift estimators.
//!
//! The model bundle is loaded once at startup; every request shares the same
//! read-only [`UpliftService`] through [`AppState`].

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uplift::UpliftService;

pub mod config;
mod error;
mod routes;

pub use error::ApiError;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    service: Arc<UpliftService>,
}

impl AppState {
    pub fn new(service: UpliftService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> &UpliftService {
        &self.service
    }
}

/// Build the router with all endpoints and middleware.
pub fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .route("/health", get(routes::liveness))
        // API endpoints
        .route("/predict", post(routes::predict))
        .route("/model", get(routes::model_info))
        // Middleware layers
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
