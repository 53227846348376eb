//! Streaming chat.

use crate::error::GatewayError;
use crate::server::GatewayState;
use crate::Result;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use axum::Json;
use frontdesk_agent::encode;
use frontdesk_core::SessionId;
use futures::StreamExt;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;

const MISSING_FIELDS: &str = "Both session_id and message are required.";

/// Body of `POST /chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatBody {
    /// The session id and trimmed message, if both are present and non-empty.
    fn into_parts(self) -> Option<(SessionId, String)> {
        let session_id = self.session_id.filter(|id| !id.is_empty())?;
        let message = self.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty())?;
        Some((SessionId::new(session_id), message))
    }
}

/// Run one receptionist turn and stream its events as `data:` frames.
pub async fn chat(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<ChatBody>, JsonRejection>,
) -> Result<Response> {
    let Json(body) = body.map_err(|rejection| GatewayError::bad_request(rejection.body_text()))?;
    let (session_id, message) = body
        .into_parts()
        .ok_or_else(|| GatewayError::bad_request(MISSING_FIELDS))?;

    info!(session = %session_id, chars = message.len(), "Chat message received");

    let frames = state
        .receptionist
        .stream(session_id, message)
        .map(|event| Ok::<_, Infallible>(encode(&event)));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"))
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
        .header("x-accel-buffering", HeaderValue::from_static("no"))
        .body(Body::from_stream(frames))
        .map_err(|e| GatewayError::Internal(e.to_string()))
}
