//! Model provider implementations for Frontdesk.
//!
//! A [`Provider`] turns a [`ChatRequest`] (history, system prompt, tool
//! catalog) into a stream of [`StreamEvent`]s that always ends with
//! [`StreamEvent::Completed`] carrying the finished [`ModelTurn`].
//!
//! - [`anthropic::AnthropicProvider`] talks to the Anthropic Messages API
//! - [`ScriptedProvider`] replays canned turns, for tests and offline runs
//!
//! # Example
//!
//! ```rust,ignore
//! use frontdesk_providers::{ChatRequest, Provider, StreamEvent};
//! use frontdesk_providers::anthropic::AnthropicProvider;
//! use futures::StreamExt;
//!
//! let provider = AnthropicProvider::new("your-api-key")?;
//! let mut stream = provider.chat_stream(request).await?;
//! while let Some(event) = stream.next().await {
//!     if let StreamEvent::TextDelta { text } = event? {
//!         print!("{}", text);
//!     }
//! }
//! ```

mod accumulator;
mod error;
mod scripted;
mod types;

#[cfg(feature = "anthropic")]
pub mod anthropic;

pub use accumulator::BlockAccumulator;
pub use error::{ProviderError, Result};
pub use scripted::{ScriptedProvider, ScriptedTurn, REQUEST_LOG_LIMIT};
pub use types::*;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of events for one model call.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// A model provider that can stream completions.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Open a streaming completion.
    ///
    /// Errors returned here mean the call never started; errors yielded by
    /// the stream mean it broke part way. A healthy stream ends with exactly
    /// one [`StreamEvent::Completed`].
    async fn chat_stream(&self, request: ChatRequest) -> Result<CompletionStream>;
}
