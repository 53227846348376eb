//! HTTP gateway for Frontdesk.
//!
//! This crate provides:
//! - `GET /session` to mint a session id
//! - `POST /chat` streaming a receptionist turn as server-sent events
//! - `GET /health` with the live session count

pub mod error;
pub mod handlers;
pub mod server;

pub use error::GatewayError;
pub use server::{Gateway, GatewayConfig, GatewayState};

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
