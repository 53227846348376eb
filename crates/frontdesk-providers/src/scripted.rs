//! Deterministic provider that replays queued turns.

use crate::{
    ChatRequest, CompletionStream, ModelTurn, Provider, ProviderError, ResponseBlock, Result,
    StopReason, StreamEvent, Usage,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Step {
    Text(String),
    Tool { id: String, name: String, input: Value },
    Thinking(String),
    Pause(Duration),
    Extra(ResponseBlock),
}

/// One canned model turn.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTurn {
    steps: Vec<Step>,
    stop_reason: Option<StopReason>,
    refuse: Option<String>,
    fail_after: Option<String>,
}

impl ScriptedTurn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a turn that only says `text`.
    pub fn reply(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    /// Stream a text chunk. Consecutive chunks join into one text block.
    pub fn text(mut self, chunk: impl Into<String>) -> Self {
        self.steps.push(Step::Text(chunk.into()));
        self
    }

    /// Request a tool call.
    pub fn tool_use(mut self, id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        self.steps.push(Step::Tool {
            id: id.into(),
            name: name.into(),
            input,
        });
        self
    }

    pub fn thinking(mut self, thinking: impl Into<String>) -> Self {
        self.steps.push(Step::Thinking(thinking.into()));
        self
    }

    /// Sleep before the next step.
    pub fn pause(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Pause(duration));
        self
    }

    /// Append a block that produces no stream event, e.g. one with metadata.
    pub fn block(mut self, block: ResponseBlock) -> Self {
        self.steps.push(Step::Extra(block));
        self
    }

    /// Override the stop reason. Defaults to `tool_use` when the turn calls a
    /// tool and `end_turn` otherwise.
    pub fn stop(mut self, reason: StopReason) -> Self {
        self.stop_reason = Some(reason);
        self
    }

    /// Fail to open the stream at all.
    pub fn refuse(message: impl Into<String>) -> Self {
        Self {
            refuse: Some(message.into()),
            ..Self::default()
        }
    }

    /// Emit the scripted steps, then break the stream instead of completing.
    pub fn then_fail(mut self, message: impl Into<String>) -> Self {
        self.fail_after = Some(message.into());
        self
    }
}

/// Most recent requests kept by [`ScriptedProvider::requests`].
pub const REQUEST_LOG_LIMIT: usize = 64;

/// Provider replaying [`ScriptedTurn`]s in order and recording the most
/// recent requests.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    turns: Mutex<VecDeque<ScriptedTurn>>,
    requests: Mutex<VecDeque<ChatRequest>>,
    fallback: Option<String>,
}

impl ScriptedProvider {
    pub fn new(turns: impl IntoIterator<Item = ScriptedTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Answer with `reply` once the script runs out, instead of erroring.
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    /// Queue more turns.
    pub fn push(&self, turn: ScriptedTurn) {
        lock(&self.turns).push_back(turn);
    }

    /// Requests received so far, oldest first, capped at
    /// [`REQUEST_LOG_LIMIT`].
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).iter().cloned().collect()
    }

    /// Turns not yet played.
    pub fn remaining(&self) -> usize {
        lock(&self.turns).len()
    }
}

// A poisoned lock only means a test thread panicked mid-push.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<CompletionStream> {
        {
            let mut requests = lock(&self.requests);
            if requests.len() == REQUEST_LOG_LIMIT {
                requests.pop_front();
            }
            requests.push_back(request);
        }

        let next = lock(&self.turns).pop_front();
        let turn = match (next, &self.fallback) {
            (Some(turn), _) => turn,
            (None, Some(reply)) => ScriptedTurn::reply(reply.clone()),
            (None, None) => return Err(ProviderError::internal("script exhausted")),
        };

        if let Some(message) = turn.refuse {
            return Err(ProviderError::api(500, message));
        }

        let stream = async_stream::stream! {
            let mut content: Vec<ResponseBlock> = Vec::new();
            let mut called_tool = false;

            for step in turn.steps {
                match step {
                    Step::Text(chunk) => {
                        match content.last_mut() {
                            Some(ResponseBlock::Text { text, .. }) => text.push_str(&chunk),
                            _ => content.push(ResponseBlock::text(chunk.clone())),
                        }
                        yield Ok(StreamEvent::TextDelta { text: chunk });
                    }
                    Step::Tool { id, name, input } => {
                        called_tool = true;
                        yield Ok(StreamEvent::ToolUseStart { id: id.clone(), name: name.clone() });
                        content.push(ResponseBlock::tool_use(id, name, input));
                    }
                    Step::Thinking(thinking) => {
                        yield Ok(StreamEvent::ThinkingDelta { thinking: thinking.clone() });
                        content.push(ResponseBlock::Thinking {
                            thinking,
                            signature: "scripted".to_string(),
                        });
                    }
                    Step::Pause(duration) => tokio::time::sleep(duration).await,
                    Step::Extra(block) => content.push(block),
                }
            }

            if let Some(message) = turn.fail_after {
                yield Err(ProviderError::stream(message));
                return;
            }

            let stop_reason = turn.stop_reason.unwrap_or(if called_tool {
                StopReason::ToolUse
            } else {
                StopReason::EndTurn
            });
            yield Ok(StreamEvent::Completed(ModelTurn {
                content,
                stop_reason,
                usage: Usage::default(),
            }));
        };

        Ok(Box::pin(stream))
    }
}
