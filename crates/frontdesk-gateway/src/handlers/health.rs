//! Health check.

use crate::server::GatewayState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Live (unexpired) sessions.
    pub sessions: usize,
}

pub async fn health(State(state): State<Arc<GatewayState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.receptionist.sessions().len().await,
    })
}
