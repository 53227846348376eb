//! Receptionist runtime for Frontdesk.
//!
//! This crate provides the conversational core:
//! - [`SessionStore`]: expiring per-session conversation history
//! - [`Persist`]: reduction of model output to its re-sendable form
//! - [`ToolDispatcher`]: the closed clinic tool catalog and its execution
//! - [`ClinicBackend`]: the appointment system the tools call into
//! - [`Receptionist`]: the model/tool turn loop, streamed as [`AgentEvent`]s

pub mod backend;
pub mod error;
pub mod events;
pub mod persist;
pub mod prompt;
pub mod runtime;
pub mod session;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{ClinicBackend, HttpClinicBackend};
pub use error::AgentError;
pub use events::{encode, AgentEvent};
pub use persist::{persist_all, Persist};
pub use runtime::{EventStream, Receptionist, RuntimeConfig};
pub use session::{HistoryGuard, SessionHandle, SessionStore};
pub use tools::{ToolDispatcher, ToolKind};

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
