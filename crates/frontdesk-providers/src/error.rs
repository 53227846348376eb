//! Error types for model providers.

use thiserror::Error;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Failures talking to the model API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 401/403: the API key was refused.
    #[error("Model API rejected the credentials: {0}")]
    Unauthorized(String),

    /// 429, with the server's `retry-after` hint in seconds.
    #[error("Model API rate limit: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    /// 400: usually a malformed history or tool schema.
    #[error("Model API rejected the request: {0}")]
    BadRequest(String),

    #[error("Model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model API unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed model payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The event stream broke, reported an error, or ended early.
    #[error("Model stream failed: {0}")]
    Stream(String),

    #[error("Provider misconfigured: {0}")]
    Config(String),

    #[error("Provider failure: {0}")]
    Internal(String),
}

impl ProviderError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify a non-success HTTP status and the API's error message.
    pub fn from_status(status: u16, message: impl Into<String>, retry_after: Option<u64>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized(message),
            429 => Self::RateLimited {
                message,
                retry_after,
            },
            400 => Self::BadRequest(message),
            _ => Self::api(status, message),
        }
    }

    /// Whether the same request may succeed later. 529 is Anthropic's
    /// "overloaded" status.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Seconds the server asked us to wait, if it said.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
