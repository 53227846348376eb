//! The receptionist turn loop.

use crate::events::AgentEvent;
use crate::persist::persist_all;
use crate::prompt::receptionist_prompt;
use crate::session::{HistoryGuard, SessionStore};
use crate::tools::ToolDispatcher;
use crate::Result;
use frontdesk_core::{Config, ContentBlock, SessionId, Turn};
use frontdesk_providers::{ChatRequest, Provider, ProviderError, StreamEvent};
use futures::{FutureExt, StreamExt};
use serde_json::{Map, Value};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};

const PANIC_MESSAGE: &str = "Internal error while handling the message";

/// Events of one receptionist turn. Always ends with [`AgentEvent::Done`].
pub type EventStream = ReceiverStream<AgentEvent>;

/// Configuration for the turn loop.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Model id sent with every call.
    pub model: String,

    /// Output token cap per model call.
    pub max_tokens: u32,

    /// System prompt sent with every call.
    pub system_prompt: String,

    /// Events buffered between the loop and a slow client.
    pub event_buffer: usize,
}

impl RuntimeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.model.clone(),
            max_tokens: config.model.max_tokens,
            system_prompt: receptionist_prompt(&config.clinic),
            event_buffer: config.gateway.event_buffer,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Runs receptionist turns against a model and the clinic tools.
///
/// Cheap to clone; clones share the provider, tools and sessions.
#[derive(Clone)]
pub struct Receptionist {
    provider: Arc<dyn Provider>,
    dispatcher: Arc<ToolDispatcher>,
    sessions: Arc<SessionStore>,
    config: RuntimeConfig,
}

impl Receptionist {
    pub fn new(
        provider: Arc<dyn Provider>,
        dispatcher: Arc<ToolDispatcher>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            sessions,
            config: RuntimeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Answer `message` in the session `session_id`.
    ///
    /// The turn runs on its own task. Dropping the returned stream stops
    /// event delivery but not the turn, so the history is always left with
    /// every tool call answered.
    pub fn stream(&self, session_id: SessionId, message: impl Into<String>) -> EventStream {
        let (tx, rx) = mpsc::channel(self.config.event_buffer.max(1));
        let this = self.clone();
        let message = message.into();

        tokio::spawn(async move {
            this.run(session_id, message, EventSink::new(tx)).await;
        });

        ReceiverStream::new(rx)
    }

    async fn run(&self, session_id: SessionId, message: String, mut sink: EventSink) {
        let handle = self.sessions.history(&session_id).await;
        let mut history = handle.lock().await;
        history.append(Turn::user_text(message));
        debug!(session = %session_id, turns = history.len(), "Turn started");

        let started = history.len();

        let outcome = AssertUnwindSafe(self.converse(&session_id, &mut history, &mut sink))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(session = %session_id, error = %e, "Turn aborted");
                sink.send(AgentEvent::error(e.to_string())).await;
            }
            Err(_) => {
                // Drop any tool call the panic left unanswered.
                history.truncate(started);
                error!(session = %session_id, "Turn panicked");
                sink.send(AgentEvent::error(PANIC_MESSAGE)).await;
            }
        }

        sink.send(AgentEvent::Done).await;
        debug!(session = %session_id, turns = history.len(), "Turn finished");
    }

    async fn converse(
        &self,
        session_id: &SessionId,
        history: &mut HistoryGuard,
        sink: &mut EventSink,
    ) -> Result<()> {
        loop {
            let request = ChatRequest::new(&self.config.model, history.snapshot())
                .with_system(&self.config.system_prompt)
                .with_tools(self.dispatcher.definitions().to_vec())
                .with_max_tokens(self.config.max_tokens);

            let mut stream = self.provider.chat_stream(request).await?;
            let mut completed = None;
            while let Some(event) = stream.next().await {
                match event? {
                    StreamEvent::ToolUseStart { name, .. } => sink.send(AgentEvent::tool(name)).await,
                    StreamEvent::TextDelta { text } => sink.send(AgentEvent::text(text)).await,
                    StreamEvent::ThinkingDelta { .. } => {}
                    StreamEvent::Completed(turn) => {
                        completed = Some(turn);
                        break;
                    }
                }
            }
            let turn = completed
                .ok_or_else(|| ProviderError::stream("model stream ended without a final message"))?;

            info!(
                session = %session_id,
                provider = self.provider.name(),
                stop_reason = ?turn.stop_reason,
                input_tokens = turn.usage.input_tokens,
                output_tokens = turn.usage.output_tokens,
                "Model call finished"
            );

            let mut content = persist_all(&turn.content);
            if !turn.wants_tools() {
                // Tool calls cut off by the stop reason would stay unanswered.
                let before = content.len();
                content.retain(|block| !matches!(block, ContentBlock::ToolUse { .. }));
                if content.len() != before {
                    warn!(session = %session_id, stop_reason = ?turn.stop_reason, "Dropped unanswerable tool calls");
                }
                if !content.is_empty() {
                    history.append(Turn::assistant(content));
                }
                return Ok(());
            }

            let assistant = Turn::assistant(content);
            let calls: Vec<(String, String, Map<String, Value>)> = assistant
                .tool_uses()
                .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
                .collect();
            history.append(assistant);

            if calls.is_empty() {
                warn!(session = %session_id, "Model asked for tools without calling any");
                return Ok(());
            }

            let mut results = Vec::with_capacity(calls.len());
            for (call_id, name, input) in calls {
                let output = self.dispatcher.invoke(&name, &input).await;
                results.push(ContentBlock::tool_result(call_id, output));
            }
            history.append(Turn::tool_results(results));
        }
    }
}

/// Sending half of an [`EventStream`] that outlives its receiver.
struct EventSink {
    tx: mpsc::Sender<AgentEvent>,
    open: bool,
}

impl EventSink {
    fn new(tx: mpsc::Sender<AgentEvent>) -> Self {
        Self { tx, open: true }
    }

    async fn send(&mut self, event: AgentEvent) {
        if self.open && self.tx.send(event).await.is_err() {
            debug!("Client went away, finishing turn silently");
            self.open = false;
        }
    }
}
