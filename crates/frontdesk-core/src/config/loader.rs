//! Configuration loading and persistence.

use super::Config;
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use crate::secret::SecretString;
use std::fs;
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path, atomically.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to a JSON5-compatible string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; pretty JSON is valid JSON5.
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.gateway.port == 0 {
            errors.push("Gateway port cannot be 0".to_string());
        }
        if self.gateway.event_buffer == 0 {
            errors.push("Gateway event_buffer must be greater than 0".to_string());
        }

        if self.model.model.trim().is_empty() {
            errors.push("Model id must not be empty".to_string());
        }
        if self.model.max_tokens == 0 {
            errors.push("Model max_tokens must be greater than 0".to_string());
        }
        if let Some(base) = &self.model.api_base {
            if !is_http_url(base) {
                errors.push(format!("Model api_base '{}' must be an http(s) URL", base));
            }
        }

        if self.session.ttl_secs == 0 {
            errors.push("Session ttl_secs must be greater than 0".to_string());
        }
        if self.session.sweep_interval_secs == 0 {
            errors.push("Session sweep_interval_secs must be greater than 0".to_string());
        }

        if self.clinic.name.trim().is_empty() {
            errors.push("Clinic name must not be empty".to_string());
        }
        if self.clinic.services.is_empty() {
            errors.push("Clinic must offer at least one service".to_string());
        }
        for (i, service) in self.clinic.services.iter().enumerate() {
            if service.trim().is_empty() {
                errors.push(format!("Clinic service [{}] must not be empty", i));
            }
        }

        if !is_http_url(&self.backend.base_url) {
            errors.push(format!(
                "Backend base_url '{}' must be an http(s) URL",
                self.backend.base_url
            ));
        }
        if self.backend.timeout_secs == 0 {
            errors.push("Backend timeout_secs must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Load from the default path, falling back to defaults when no file exists,
    /// then apply environment overrides.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let config = match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(path)) => {
                debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        Ok(config.with_env_overrides())
    }

    /// Apply `ANTHROPIC_API_KEY`, `FRONTDESK_MODEL`, `FRONTDESK_BACKEND_URL`,
    /// `FRONTDESK_PORT` and `FRONTDESK_SESSION_TTL` on top of this config.
    ///
    /// The API key from the environment only fills a missing config key.
    pub fn with_env_overrides(mut self) -> Self {
        let has_key = self.model.api_key.as_ref().is_some_and(|k| !k.is_empty());
        if !has_key {
            if let Some(key) = env::get_var(env::vars::ANTHROPIC_API_KEY) {
                self.model.api_key = Some(SecretString::new(key));
            }
        }
        if let Some(model) = env::get_var(env::vars::FRONTDESK_MODEL) {
            self.model.model = model;
        }
        if let Some(url) = env::get_var(env::vars::FRONTDESK_BACKEND_URL) {
            self.backend.base_url = url;
        }
        if let Some(port) = env::get_u16(env::vars::FRONTDESK_PORT) {
            self.gateway.port = port;
        }
        if let Some(ttl) = env::get_u64(env::vars::FRONTDESK_SESSION_TTL) {
            self.session.ttl_secs = ttl;
        }
        self
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BindMode, LogFormat, ProviderKind};
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_config() {
        let content = r#"{
            // trailing commas and comments are fine
            clinic: { name: "Pearl Dental", },
        }"#;

        let config = Config::parse(content).unwrap();
        assert_eq!(config.clinic.name, "Pearl Dental");
        assert_eq!(config.clinic.phone, "0301-9568220");
        assert_eq!(config.session.ttl_secs, 7200);
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"{
            gateway: { bind: "lan", port: 8080, cors_origins: ["https://clinic.example"], event_buffer: 4 },
            model: { provider: "scripted", model: "claude-test", max_tokens: 512, api_key: "sk-test" },
            session: { ttl_secs: 60, sweep_interval_secs: 5 },
            backend: { base_url: "https://api.clinic.example", timeout_secs: 3 },
            logging: { level: "debug", format: "json" },
        }"#;

        let config = Config::parse(content).unwrap();
        assert_eq!(config.gateway.bind, BindMode::Lan);
        assert_eq!(config.gateway.cors_origins, vec!["https://clinic.example"]);
        assert_eq!(config.model.provider, ProviderKind::Scripted);
        assert_eq!(config.model.api_key.as_ref().unwrap().expose_secret(), "sk-test");
        assert_eq!(config.session.sweep_interval_secs, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        let err = Config::parse("{ gateway: { port: \"high\" } }").unwrap_err();
        assert!(matches!(err, ConfigError::Json5(_)));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = Config::default();
        config.gateway.port = 0;
        config.session.ttl_secs = 0;
        config.backend.base_url = "ftp://nope".to_string();

        let err_msg = config.validate().unwrap_err().to_string();
        assert!(err_msg.contains("port"), "missing port error: {}", err_msg);
        assert!(err_msg.contains("ttl_secs"), "missing ttl error: {}", err_msg);
        assert!(err_msg.contains("base_url"), "missing url error: {}", err_msg);
    }

    #[test]
    fn test_validate_empty_services() {
        let mut config = Config::default();
        config.clinic.services.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("frontdesk.json5");

        let mut config = Config::default();
        config.gateway.port = 9090;
        config.clinic.system_prompt = Some("Be brief.".to_string());
        config.save(&path).unwrap();

        assert!(!path.with_extension("tmp").exists());
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.gateway.port, 9090);
        assert_eq!(loaded.clinic.system_prompt.as_deref(), Some("Be brief."));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.json5")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_env_key_does_not_replace_configured_key() {
        std::env::set_var(env::vars::ANTHROPIC_API_KEY, "from-env");
        let mut config = Config::default();
        config.model.api_key = Some(SecretString::new("from-file"));

        let config = config.with_env_overrides();
        assert_eq!(config.model.api_key.unwrap().expose_secret(), "from-file");
    }
}
