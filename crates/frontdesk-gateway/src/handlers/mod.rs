//! HTTP route handlers.

pub mod chat;
pub mod health;
pub mod sessions;

pub use chat::{chat, ChatBody};
pub use health::{health, HealthResponse};
pub use sessions::{create_session, SessionCreated};
