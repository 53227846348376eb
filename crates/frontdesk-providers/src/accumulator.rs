//! Assembly of streamed content-block fragments into finished blocks.

use crate::{ModelTurn, ProviderError, ResponseBlock, Result, StopReason, StreamEvent, Usage};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Collects block starts and deltas, keyed by block index, until the message
/// is complete.
#[derive(Debug, Default)]
pub struct BlockAccumulator {
    blocks: BTreeMap<usize, PartialBlock>,
    stop_reason: Option<StopReason>,
    usage: Usage,
}

#[derive(Debug)]
enum PartialBlock {
    Text {
        text: String,
        citations: Vec<Value>,
    },
    ToolUse {
        id: String,
        name: String,
        input: Map<String, Value>,
        json: String,
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

fn take_string(fields: &mut Map<String, Value>, key: &str) -> String {
    match fields.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

impl BlockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the block at `index` from a `content_block` object.
    ///
    /// Returns [`StreamEvent::ToolUseStart`] when the block is a tool call.
    pub fn start_block(&mut self, index: usize, mut block: Map<String, Value>) -> Option<StreamEvent> {
        let kind = take_string(&mut block, "type");
        let (partial, event) = match kind.as_str() {
            "text" => {
                let citations = match block.remove("citations") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                let text = take_string(&mut block, "text");
                (PartialBlock::Text { text, citations }, None)
            }
            "tool_use" => {
                let id = take_string(&mut block, "id");
                let name = take_string(&mut block, "name");
                let input = match block.remove("input") {
                    Some(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                let event = StreamEvent::ToolUseStart {
                    id: id.clone(),
                    name: name.clone(),
                };
                let partial = PartialBlock::ToolUse {
                    id,
                    name,
                    input,
                    json: String::new(),
                };
                (partial, Some(event))
            }
            "thinking" => {
                let thinking = take_string(&mut block, "thinking");
                let signature = take_string(&mut block, "signature");
                (PartialBlock::Thinking { thinking, signature }, None)
            }
            _ => (PartialBlock::Other { kind, fields: block }, None),
        };
        self.blocks.insert(index, partial);
        event
    }

    pub fn push_text(&mut self, index: usize, fragment: &str) {
        let block = self.blocks.entry(index).or_insert_with(|| PartialBlock::Text {
            text: String::new(),
            citations: Vec::new(),
        });
        match block {
            PartialBlock::Text { text, .. } => text.push_str(fragment),
            _ => debug!(index, "Text delta for non-text block ignored"),
        }
    }

    pub fn push_citation(&mut self, index: usize, citation: Value) {
        if let Some(PartialBlock::Text { citations, .. }) = self.blocks.get_mut(&index) {
            citations.push(citation);
        }
    }

    pub fn push_input_json(&mut self, index: usize, fragment: &str) {
        match self.blocks.get_mut(&index) {
            Some(PartialBlock::ToolUse { json, .. }) => json.push_str(fragment),
            _ => debug!(index, "Input delta for non-tool block ignored"),
        }
    }

    pub fn push_thinking(&mut self, index: usize, fragment: &str) {
        let block = self.blocks.entry(index).or_insert_with(|| PartialBlock::Thinking {
            thinking: String::new(),
            signature: String::new(),
        });
        if let PartialBlock::Thinking { thinking, .. } = block {
            thinking.push_str(fragment);
        }
    }

    pub fn push_signature(&mut self, index: usize, fragment: &str) {
        if let Some(PartialBlock::Thinking { signature, .. }) = self.blocks.get_mut(&index) {
            signature.push_str(fragment);
        }
    }

    pub fn set_stop_reason(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
    }

    /// Merge a usage report. Counters only grow.
    pub fn record_usage(&mut self, usage: Usage) {
        self.usage.input_tokens = self.usage.input_tokens.max(usage.input_tokens);
        self.usage.output_tokens = self.usage.output_tokens.max(usage.output_tokens);
        self.usage.cache_read_tokens = self.usage.cache_read_tokens.max(usage.cache_read_tokens);
        self.usage.cache_creation_tokens =
            self.usage.cache_creation_tokens.max(usage.cache_creation_tokens);
    }

    /// Finalize every block in index order.
    ///
    /// Tool input is the accumulated JSON text, or the start block's input
    /// when no fragments arrived. Unparseable input fails the turn only when
    /// the model stopped to use tools; after any other stop the call was cut
    /// short and keeps its start input.
    pub fn finish(self) -> Result<ModelTurn> {
        let stop_reason = self.stop_reason.unwrap_or(StopReason::Unknown);
        let mut content = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.into_values() {
            content.push(match block {
                PartialBlock::Text { text, citations } => ResponseBlock::Text { text, citations },
                PartialBlock::ToolUse {
                    id,
                    name,
                    input,
                    json,
                } => {
                    let input = if json.trim().is_empty() {
                        input
                    } else {
                        match serde_json::from_str(&json) {
                            Ok(parsed) => parsed,
                            Err(e) if stop_reason == StopReason::ToolUse => {
                                return Err(ProviderError::stream(format!(
                                    "invalid input JSON for tool '{}': {}",
                                    name, e
                                )));
                            }
                            Err(e) => {
                                warn!(tool = %name, ?stop_reason, error = %e, "Incomplete tool input");
                                input
                            }
                        }
                    };
                    ResponseBlock::ToolUse { id, name, input }
                }
                PartialBlock::Thinking {
                    thinking,
                    signature,
                } => ResponseBlock::Thinking {
                    thinking,
                    signature,
                },
                PartialBlock::Other { kind, fields } => ResponseBlock::Other { kind, fields },
            });
        }

        Ok(ModelTurn {
            content,
            stop_reason,
            usage: self.usage,
        })
    }
}
