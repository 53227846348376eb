//! CLI command implementations.

pub mod chat;
pub mod config;
pub mod serve;

use anyhow::{anyhow, bail, Context};
use frontdesk_agent::{HttpClinicBackend, Receptionist, RuntimeConfig, SessionStore, ToolDispatcher};
use frontdesk_core::config::{ModelConfig, ProviderKind};
use frontdesk_core::Config;
use frontdesk_providers::anthropic::AnthropicProvider;
use frontdesk_providers::{Provider, ScriptedProvider};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What the scripted provider says once it has nothing queued.
const OFFLINE_REPLY: &str =
    "Our virtual receptionist is offline right now. Please call the clinic during business hours.";

/// Load the configuration from `path`, or the default location, with
/// environment overrides applied.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
            .with_env_overrides(),
        None => Config::load_or_default()?,
    };
    Ok(config)
}

/// Parse a provider name as accepted on the command line.
pub fn parse_provider(name: &str) -> anyhow::Result<ProviderKind> {
    match name {
        "anthropic" => Ok(ProviderKind::Anthropic),
        "scripted" => Ok(ProviderKind::Scripted),
        other => bail!("Unknown provider: {}. Valid options: anthropic, scripted", other),
    }
}

/// Build the model provider selected by the config.
pub fn build_provider(model: &ModelConfig) -> anyhow::Result<Arc<dyn Provider>> {
    match model.provider {
        ProviderKind::Anthropic => {
            let key = model
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| anyhow!("No Anthropic API key: set ANTHROPIC_API_KEY or model.api_key"))?;
            let hint = key.hint();

            let mut provider = AnthropicProvider::new(key)?
                .with_timeout(Duration::from_secs(model.request_timeout_secs))?;
            if let Some(base) = &model.api_base {
                provider = provider.with_base_url(base.clone());
            }

            info!(model = %model.model, key = %hint, api_base = provider.api_base(), "Using Anthropic provider");
            Ok(Arc::new(provider))
        }
        ProviderKind::Scripted => {
            warn!("Using the scripted provider, every reply is canned");
            Ok(Arc::new(ScriptedProvider::default().with_fallback(OFFLINE_REPLY)))
        }
    }
}

/// Wire provider, clinic backend and session store into a [`Receptionist`].
pub fn build_receptionist(config: &Config) -> anyhow::Result<Receptionist> {
    let provider = build_provider(&config.model)?;

    let backend = HttpClinicBackend::new(
        config.backend.base_url.clone(),
        Duration::from_secs(config.backend.timeout_secs),
    )?;
    let dispatcher = ToolDispatcher::new(Arc::new(backend), config.clinic.services.clone());
    let sessions = SessionStore::new(Duration::from_secs(config.session.ttl_secs));

    Ok(
        Receptionist::new(provider, Arc::new(dispatcher), Arc::new(sessions))
            .with_config(RuntimeConfig::from_config(config)),
    )
}
