//! Session creation.

use axum::Json;
use frontdesk_core::SessionId;
use serde::Serialize;
use tracing::debug;

/// Response of `GET /session`.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
}

/// Mint a fresh session id. The session itself is created on first message.
pub async fn create_session() -> Json<SessionCreated> {
    let session_id = SessionId::generate();
    debug!(session = %session_id, "Issued session id");
    Json(SessionCreated { session_id })
}
