//! Environment variable lookups.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable parsed as a u16 (ports).
pub fn get_u16(name: &str) -> Option<u16> {
    get_var(name).and_then(|v| v.trim().parse().ok())
}

/// Get an environment variable parsed as a u64.
pub fn get_u64(name: &str) -> Option<u64> {
    get_var(name).and_then(|v| v.trim().parse().ok())
}

/// Environment variable names read by Frontdesk.
pub mod vars {
    /// API key for the Anthropic Messages API.
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

    /// Base directory override.
    pub const FRONTDESK_HOME: &str = "FRONTDESK_HOME";

    /// Config file override.
    pub const FRONTDESK_CONFIG: &str = "FRONTDESK_CONFIG";

    /// Model id override.
    pub const FRONTDESK_MODEL: &str = "FRONTDESK_MODEL";

    /// Clinic backend base URL override.
    pub const FRONTDESK_BACKEND_URL: &str = "FRONTDESK_BACKEND_URL";

    /// Gateway port override.
    pub const FRONTDESK_PORT: &str = "FRONTDESK_PORT";

    /// Session TTL override, in seconds.
    pub const FRONTDESK_SESSION_TTL: &str = "FRONTDESK_SESSION_TTL";
}
