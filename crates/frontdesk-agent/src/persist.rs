//! Reduction of model output to the form stored in history.
//!
//! The model API rejects response-only metadata when it is sent back as
//! input, so every block is stripped to its minimal input shape before it is
//! appended to a session.

use frontdesk_core::ContentBlock;
use frontdesk_providers::ResponseBlock;

/// Conversion of a content block to its persisted form.
///
/// Total and pure. Persisting an already persisted block returns it unchanged.
pub trait Persist {
    fn persist(&self) -> ContentBlock;
}

impl Persist for ResponseBlock {
    fn persist(&self) -> ContentBlock {
        match self {
            ResponseBlock::Text { text, .. } => ContentBlock::Text { text: text.clone() },
            ResponseBlock::ToolUse { id, name, input } => ContentBlock::ToolUse {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            },
            ResponseBlock::Thinking {
                thinking,
                signature,
            } => ContentBlock::Thinking {
                thinking: thinking.clone(),
                signature: signature.clone(),
            },
            ResponseBlock::Other { kind, .. } => ContentBlock::Opaque { kind: kind.clone() },
        }
    }
}

impl Persist for ContentBlock {
    fn persist(&self) -> ContentBlock {
        self.clone()
    }
}

/// Persist a whole turn's blocks, keeping their order.
pub fn persist_all<B: Persist>(blocks: &[B]) -> Vec<ContentBlock> {
    blocks.iter().map(Persist::persist).collect()
}
