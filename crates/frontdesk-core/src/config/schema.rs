//! Configuration schema definitions.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};

/// Main Frontdesk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Language model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Conversation session lifetime.
    #[serde(default)]
    pub session: SessionConfig,

    /// Clinic identity used by the receptionist prompt.
    #[serde(default)]
    pub clinic: ClinicConfig,

    /// Appointment backend the tools call into.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gateway configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind mode.
    #[serde(default)]
    pub bind: BindMode,

    /// Port number.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Capacity of the per-request event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: BindMode::default(),
            port: default_port(),
            cors_origins: Vec::new(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_port() -> u16 {
    5000
}

fn default_event_buffer() -> usize {
    16
}

/// Bind mode for the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Bind to loopback only (127.0.0.1).
    #[default]
    Loopback,

    /// Bind to all interfaces (0.0.0.0).
    Lan,
}

impl BindMode {
    /// The IP address string to bind to.
    pub fn host(&self) -> &'static str {
        match self {
            BindMode::Loopback => "127.0.0.1",
            BindMode::Lan => "0.0.0.0",
        }
    }
}

/// Model provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API.
    #[default]
    Anthropic,

    /// Offline provider that answers with a canned reply. Useful for demos.
    Scripted,
}

/// Model configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model id sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Output token cap per model call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// API key. Falls back to `ANTHROPIC_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// HTTP timeout for one model call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_base: None,
            api_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_model() -> String {
    "claude-opus-4-6".to_string()
}

fn default_max_tokens() -> u32 {
    8096
}

fn default_request_timeout() -> u64 {
    300
}

/// Session configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a conversation is forgotten, in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// How often expired sessions are swept, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_ttl() -> u64 {
    7200
}

fn default_sweep_interval() -> u64 {
    60
}

/// Clinic configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicConfig {
    #[serde(default = "default_clinic_name")]
    pub name: String,

    /// Phone number given out for emergencies and escalation.
    #[serde(default = "default_clinic_phone")]
    pub phone: String,

    /// Bookable service keys, exposed to the model as an enum.
    #[serde(default = "default_services")]
    pub services: Vec<String>,

    /// Replaces the built-in receptionist prompt entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            name: default_clinic_name(),
            phone: default_clinic_phone(),
            services: default_services(),
            system_prompt: None,
        }
    }
}

fn default_clinic_name() -> String {
    "Bright Smile Dental".to_string()
}

fn default_clinic_phone() -> String {
    "0301-9568220".to_string()
}

fn default_services() -> Vec<String> {
    ["cleaning", "checkup", "filling", "extraction", "whitening", "emergency"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Backend configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the appointment service; tools POST to `{base_url}/tools/<name>`.
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Per-call timeout, in seconds.
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

/// Logging configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,

    /// One JSON object per line.
    Json,
}
