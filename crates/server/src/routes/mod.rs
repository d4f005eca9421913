//! API route handlers
//!
//! - `health`: liveness, readiness and Prometheus metrics
//! - `matching`: user matching and similar-description search

pub mod health;
pub mod matching;

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ServerError;
use crate::state::ServerState;

/// API information (GET /)
///
/// ```json
/// {
///   "name": "Transaction Matching API",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "name": state.config.title,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/match-users/{id}",
            "/search-similar-descriptions?query=",
            "/health",
            "/ready",
            "/metrics"
        ]
    }))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
