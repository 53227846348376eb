//! Agent error types.

use frontdesk_providers::ProviderError;
use thiserror::Error;

/// Errors that can occur during agent operations.
///
/// Only [`AgentError::Provider`] ever reaches a client, as a single error
/// event. Every other variant is raised by a tool and folded into that
/// tool's textual result.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model call failed to start or broke part way.
    #[error("Model error: {0}")]
    Provider(#[from] ProviderError),

    /// Tool input did not match the tool's schema.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The clinic backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// Transport failure talking to the clinic backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgentError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        Self::Backend {
            status,
            body: body.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_retryable(),
            Self::Http(_) => true,
            Self::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
