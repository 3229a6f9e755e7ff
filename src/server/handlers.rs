use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use super::AppState;

/// Simple health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "schemascope",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// The schema graph snapshot, serialized verbatim as `{tables, links}`.
pub async fn schema_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.graph.as_ref().clone())
}
