// Thin namespace wrapper for API-layer components
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

pub mod handlers {
    pub use crate::handlers::*;
}

/// Request size limit: 200 names fit comfortably in 1MB.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// API routes with their shared state. Rate limiting, tracing and CORS are
/// layered on by the binary.
pub fn router(state: Arc<handlers::AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/operations", get(handlers::list_operations))
        .route("/api/v1/analyze/:operation", post(handlers::analyze))
        .route(
            "/api/v1/credentials/verify",
            post(handlers::verify_credentials),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
