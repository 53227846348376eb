//! Client-facing events and their wire framing.

use serde::{Deserialize, Serialize};

/// An event of a receptionist turn, as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentEvent {
    /// A chunk of assistant text.
    Text { chunk: String },
    /// The model started calling a tool.
    Tool { name: String },
    /// The model call failed. At most one per stream, always before `Done`.
    Error { message: String },
    /// End of stream. Exactly one per stream, always last.
    Done,
}

impl AgentEvent {
    pub fn text(chunk: impl Into<String>) -> Self {
        Self::Text {
            chunk: chunk.into(),
        }
    }

    pub fn tool(name: impl Into<String>) -> Self {
        Self::Tool { name: name.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Frame an event as one server-sent event: `data: <json>\n\n`.
pub fn encode(event: &AgentEvent) -> String {
    // Serializing a tagged enum of strings cannot fail.
    let json = serde_json::to_string(event).unwrap_or_else(|_| String::from(r#"{"type":"done"}"#));
    format!("data: {}\n\n", json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames() {
        assert_eq!(
            encode(&AgentEvent::text("Hi \"there\"")),
            "data: {\"type\":\"text\",\"chunk\":\"Hi \\\"there\\\"\"}\n\n"
        );
        assert_eq!(
            encode(&AgentEvent::tool("check_availability")),
            "data: {\"type\":\"tool\",\"name\":\"check_availability\"}\n\n"
        );
        assert_eq!(
            encode(&AgentEvent::error("Model error: overloaded")),
            "data: {\"type\":\"error\",\"message\":\"Model error: overloaded\"}\n\n"
        );
        assert_eq!(encode(&AgentEvent::Done), "data: {\"type\":\"done\"}\n\n");
    }

    #[test]
    fn test_frame_payload_is_json() {
        let frame = encode(&AgentEvent::text("line one\nline two"));
        let payload = frame.strip_prefix("data: ").unwrap().strip_suffix("\n\n").unwrap();
        assert!(!payload.contains('\n'));
        let parsed: AgentEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed, AgentEvent::text("line one\nline two"));
    }
}
