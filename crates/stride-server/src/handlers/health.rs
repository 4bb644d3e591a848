//! Health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use stride_core::AIBackend;

/// Server and AI backend status
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub ai_configured: bool,
    pub ai_healthy: bool,
    pub model: Option<String>,
}

/// GET /api/health - Server status with a live AI backend check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    let (ai_healthy, model) = match state.ai() {
        Some(client) => (client.health_check().await, Some(client.model().to_string())),
        None => (false, None),
    };

    Json(HealthStatus {
        status: "ok",
        ai_configured: state.ai().is_some(),
        ai_healthy,
        model,
    })
}
