//! Request, response and stream event types shared by all providers.

use frontdesk_core::{ToolDefinition, Turn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One model invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model id.
    pub model: String,

    /// System prompt. Empty means none.
    pub system: String,

    /// Full conversation history, oldest first.
    pub messages: Vec<Turn>,

    /// Tools the model may call.
    pub tools: Vec<ToolDefinition>,

    /// Output token cap.
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Turn>) -> Self {
        Self {
            model: model.into(),
            system: String::new(),
            messages,
            tools: Vec::new(),
            max_tokens: 4096,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Incremental output of a streaming call.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A tool-call block opened. Its input is not known yet.
    ToolUseStart { id: String, name: String },

    /// Partial visible text.
    TextDelta { text: String },

    /// Partial extended-thinking text. Never shown to the end user.
    ThinkingDelta { thinking: String },

    /// The call finished; always the last event of a healthy stream.
    Completed(ModelTurn),
}

/// Everything a finished model call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTurn {
    pub content: Vec<ResponseBlock>,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl ModelTurn {
    /// Whether the model stopped to have tools run.
    pub fn wants_tools(&self) -> bool {
        self.stop_reason == StopReason::ToolUse
    }
}

/// A content block as returned by the model, before persistence.
///
/// May carry metadata the API does not accept back as input, such as text
/// citations or fields of block kinds this crate does not model.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBlock {
    Text {
        text: String,
        citations: Vec<Value>,
    },
    ToolUse {
        id: String,
        name: String,
        input: Map<String, Value>,
    },
    Thinking {
        thinking: String,
        signature: String,
    },
    Other {
        kind: String,
        fields: Map<String, Value>,
    },
}

impl ResponseBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    /// Build a tool call from a JSON object. Non-object input becomes `{}`.
    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        let input = match input {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// Hit a stop sequence.
    StopSequence,
    /// Hit max tokens limit.
    MaxTokens,
    /// Model wants to use a tool.
    ToolUse,
    /// Model declined to answer.
    Refusal,
    Unknown,
}

impl StopReason {
    /// Parse the API's `stop_reason` string.
    pub fn from_api(reason: Option<&str>) -> Self {
        match reason {
            Some("end_turn") => Self::EndTurn,
            Some("stop_sequence") => Self::StopSequence,
            Some("max_tokens") => Self::MaxTokens,
            Some("tool_use") => Self::ToolUse,
            Some("refusal") => Self::Refusal,
            _ => Self::Unknown,
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_tokens: u64,
    #[serde(default)]
    pub cache_creation_tokens: u64,
}

impl Usage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
