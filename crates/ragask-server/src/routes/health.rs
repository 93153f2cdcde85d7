//! Liveness and configuration diagnostics.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use ragask_core::ConfigReport;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/debug/env", get(debug_env))
}

/// GET /health, independent of configuration.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /debug/env, reporting which settings are present.
///
/// Endpoint URLs, index and deployment names are returned in plaintext.
async fn debug_env() -> Json<ConfigReport> {
    Json(ConfigReport::from_env())
}
