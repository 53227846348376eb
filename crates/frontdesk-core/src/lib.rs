//! # frontdesk-core
//!
//! Core types, configuration, and utilities shared by every Frontdesk crate:
//!
//! - **Configuration**: JSON5 config file loading, validation and env overrides
//! - **Types**: conversation turns, content blocks, tool definitions, session ids
//! - **Utilities**: path resolution, environment lookups, secret handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use secret::SecretString;
pub use types::*;
