//! Serve command.

use super::{build_receptionist, load_config, parse_provider};
use clap::Args;
use frontdesk_core::config::BindMode;
use frontdesk_core::Config;
use frontdesk_gateway::{Gateway, GatewayConfig};
use std::path::Path;
use tracing::info;

/// Serve command arguments.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind mode
    #[arg(short, long, value_parser = ["loopback", "lan"])]
    pub bind: Option<String>,

    /// Port number
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Model provider
    #[arg(long, env = "FRONTDESK_PROVIDER", value_parser = ["anthropic", "scripted"])]
    pub provider: Option<String>,

    /// Model to use
    #[arg(long)]
    pub model: Option<String>,
}

impl ServeArgs {
    /// Layer the command-line flags over `config`.
    pub fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(bind) = &self.bind {
            config.gateway.bind = match bind.as_str() {
                "lan" => BindMode::Lan,
                _ => BindMode::Loopback,
            };
        }
        if let Some(port) = self.port {
            config.gateway.port = port;
        }
        if let Some(provider) = &self.provider {
            config.model.provider = parse_provider(provider)?;
        }
        if let Some(model) = &self.model {
            config.model.model = model.clone();
        }
        Ok(())
    }
}

/// Run the serve command.
pub async fn run(args: ServeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config)?;
    config.validate()?;

    let receptionist = build_receptionist(&config)?;
    info!(
        clinic = %config.clinic.name,
        backend = %config.backend.base_url,
        ttl_secs = config.session.ttl_secs,
        "Receptionist ready"
    );

    let gateway = Gateway::new(GatewayConfig::from_config(&config), receptionist);
    gateway.run().await?;
    Ok(())
}
