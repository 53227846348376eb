//! Shared type definitions.

mod conversation;
mod identifiers;
mod tool;

pub use conversation::*;
pub use identifiers::*;
pub use tool::*;
