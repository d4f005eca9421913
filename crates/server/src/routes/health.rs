use std::sync::Arc;
use std::time::SystemTime;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use txmatch::EmbeddingProvider;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "txmatch-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// Always 200: records and the embedder load on first use, so "pending"
/// components are not a reason to refuse traffic.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let engine = &state.engine;
    let records = if engine.store().is_loaded() {
        "loaded"
    } else {
        "pending"
    };
    let embedder = if engine.embedder().is_ready() {
        "ready"
    } else {
        "pending"
    };

    Json(json!({
        "status": "ready",
        "service": "txmatch-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "record_store": records,
            "embedder": embedder,
            "model": engine.embedder().model_name(),
        }
    }))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let handle = state.metrics.as_ref().ok_or(ServerError::NotFound)?;
    Ok((
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
