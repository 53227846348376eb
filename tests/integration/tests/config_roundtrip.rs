//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be written to disk and loaded
//! back with identical field values, and that the loaded config drives the
//! runtime and gateway settings.

use frontdesk_agent::RuntimeConfig;
use frontdesk_core::config::{BindMode, Config, LogFormat, ProviderKind};
use frontdesk_core::SecretString;
use frontdesk_gateway::GatewayConfig;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frontdesk.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, config.gateway.port);
    assert_eq!(loaded.gateway.bind, config.gateway.bind);
    assert_eq!(loaded.session.ttl_secs, config.session.ttl_secs);
    assert_eq!(loaded.clinic.services, config.clinic.services);
    assert!(loaded.model.api_key.is_none());
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("frontdesk.json5");

    let mut config = Config::default();
    config.gateway.port = 9090;
    config.gateway.bind = BindMode::Lan;
    config.model.provider = ProviderKind::Scripted;
    config.model.api_key = Some(SecretString::new("sk-ant-roundtrip"));
    config.logging.format = LogFormat::Json;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, 9090);
    assert_eq!(loaded.gateway.bind, BindMode::Lan);
    assert_eq!(loaded.model.provider, ProviderKind::Scripted);
    assert_eq!(
        loaded.model.api_key.as_ref().map(SecretString::expose_secret),
        Some("sk-ant-roundtrip")
    );
    assert_eq!(loaded.logging.format, LogFormat::Json);
}

#[test]
fn test_hand_written_json5_drives_runtime() {
    let config = Config::parse(
        r#"{
            // Pearl Dental, downtown branch
            gateway: { port: 8081, cors_origins: ['https://pearl.example'], event_buffer: 4 },
            model: { model: 'claude-sonnet-4-5', max_tokens: 1024 },
            session: { ttl_secs: 600, sweep_interval_secs: 30 },
            clinic: { name: 'Pearl Dental', phone: '555-0199' },
        }"#,
    )
    .unwrap();
    config.validate().unwrap();

    let runtime = RuntimeConfig::from_config(&config);
    assert_eq!(runtime.model, "claude-sonnet-4-5");
    assert_eq!(runtime.max_tokens, 1024);
    assert_eq!(runtime.event_buffer, 4);
    assert!(runtime.system_prompt.contains("Pearl Dental"));
    assert!(runtime.system_prompt.contains("555-0199"));

    let gateway = GatewayConfig::from_config(&config);
    assert_eq!(gateway.port, 8081);
    assert_eq!(gateway.cors_origins, vec!["https://pearl.example"]);
    assert_eq!(gateway.sweep_interval, Duration::from_secs(30));
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/frontdesk.json5"));
    assert!(result.unwrap_err().is_not_found());
}

#[test]
fn test_config_parse_invalid() {
    assert!(Config::parse("not valid json").is_err());
}
