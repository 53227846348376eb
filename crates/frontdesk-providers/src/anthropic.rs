//! Anthropic Claude provider implementation.
//!
//! Streams the Messages API (`POST /v1/messages` with `stream: true`) and
//! turns its server-sent events into [`StreamEvent`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use frontdesk_providers::anthropic::AnthropicProvider;
//!
//! let provider = AnthropicProvider::new("your-api-key")?
//!     .with_base_url("http://localhost:9000");
//! let stream = provider.chat_stream(request).await?;
//! ```

use crate::{
    BlockAccumulator, ChatRequest, CompletionStream, Provider, ProviderError, Result, StopReason,
    StreamEvent, Usage,
};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use frontdesk_core::{SecretString, ToolDefinition, Turn};
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Anthropic API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

/// Current API version.
const API_VERSION: &str = "2023-06-01";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: SecretString,
    api_base: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with an API key.
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::config("API key is required"));
        }

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the whole-request timeout, including the streamed body.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::config(format!("Failed to create HTTP client: {}", e)))
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<CompletionStream> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: (!request.system.is_empty()).then_some(request.system.as_str()),
            messages: &request.messages,
            tools: &request.tools,
            stream: true,
        };

        debug!(
            model = %request.model,
            turns = request.messages.len(),
            tools = request.tools.len(),
            "Sending streaming request to Anthropic"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| if text.is_empty() { status.to_string() } else { text });
            return Err(ProviderError::from_status(status.as_u16(), message, retry_after));
        }

        let mut events = response.bytes_stream().eventsource();

        let stream = async_stream::stream! {
            let mut acc = BlockAccumulator::new();
            let mut stopped = false;

            while let Some(event) = events.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        yield Err(ProviderError::stream(e.to_string()));
                        return;
                    }
                };
                if event.data.is_empty() {
                    continue;
                }

                let parsed = match serde_json::from_str::<SseEvent>(&event.data) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        warn!(event = %event.event, "Failed to parse SSE event: {}", e);
                        continue;
                    }
                };

                match parsed {
                    SseEvent::MessageStart { message } => {
                        if let Some(usage) = message.usage {
                            acc.record_usage(usage.into());
                        }
                    }
                    SseEvent::ContentBlockStart { index, content_block } => {
                        if let Some(started) = acc.start_block(index, content_block) {
                            yield Ok(started);
                        }
                    }
                    SseEvent::ContentBlockDelta { index, delta } => match delta {
                        BlockDelta::TextDelta { text } => {
                            acc.push_text(index, &text);
                            yield Ok(StreamEvent::TextDelta { text });
                        }
                        BlockDelta::InputJsonDelta { partial_json } => {
                            acc.push_input_json(index, &partial_json);
                        }
                        BlockDelta::ThinkingDelta { thinking } => {
                            acc.push_thinking(index, &thinking);
                            yield Ok(StreamEvent::ThinkingDelta { thinking });
                        }
                        BlockDelta::SignatureDelta { signature } => {
                            acc.push_signature(index, &signature);
                        }
                        BlockDelta::CitationsDelta { citation } => {
                            acc.push_citation(index, citation);
                        }
                        BlockDelta::Unknown => {}
                    },
                    SseEvent::ContentBlockStop { .. } | SseEvent::Ping => {}
                    SseEvent::MessageDelta { delta, usage } => {
                        acc.set_stop_reason(StopReason::from_api(delta.stop_reason.as_deref()));
                        if let Some(usage) = usage {
                            acc.record_usage(usage.into());
                        }
                    }
                    SseEvent::MessageStop => {
                        stopped = true;
                        break;
                    }
                    SseEvent::Error { error } => {
                        yield Err(ProviderError::stream(format!("{}: {}", error.error_type, error.message)));
                        return;
                    }
                    SseEvent::Unknown => {}
                }
            }

            if !stopped {
                yield Err(ProviderError::stream("stream ended before message_stop"));
                return;
            }

            yield acc.finish().map(StreamEvent::Completed);
        };

        Ok(Box::pin(stream))
    }
}

// Wire types for the Messages API

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [Turn],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    stream: bool,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    error_type: String,
    message: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SseEvent {
    MessageStart {
        message: StreamMessage,
    },
    ContentBlockStart {
        index: usize,
        content_block: Map<String, Value>,
    },
    ContentBlockDelta {
        index: usize,
        delta: BlockDelta,
    },
    ContentBlockStop {
        #[allow(dead_code)]
        index: usize,
    },
    MessageDelta {
        delta: MessageDelta,
        #[serde(default)]
        usage: Option<WireUsage>,
    },
    MessageStop,
    Ping,
    Error {
        error: ApiErrorDetail,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
struct StreamMessage {
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockDelta {
    TextDelta { text: String },
    InputJsonDelta { partial_json: String },
    ThinkingDelta { thinking: String },
    SignatureDelta { signature: String },
    CitationsDelta { citation: Value },
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
struct MessageDelta {
    stop_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
    #[serde(default)]
    cache_read_input_tokens: Option<u64>,
    #[serde(default)]
    cache_creation_input_tokens: Option<u64>,
}

impl From<WireUsage> for Usage {
    fn from(u: WireUsage) -> Self {
        Usage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
            cache_read_tokens: u.cache_read_input_tokens.unwrap_or(0),
            cache_creation_tokens: u.cache_creation_input_tokens.unwrap_or(0),
        }
    }
}
