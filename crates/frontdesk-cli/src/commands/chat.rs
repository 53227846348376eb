//! Terminal chat command.

use super::{build_receptionist, load_config, parse_provider};
use crate::repl::Repl;
use clap::Args;
use frontdesk_core::SessionId;
use std::path::Path;

/// Chat command arguments.
#[derive(Args)]
pub struct ChatArgs {
    /// Resume a session id instead of starting a new one
    #[arg(short, long)]
    pub session: Option<String>,

    /// Model provider
    #[arg(long, env = "FRONTDESK_PROVIDER", value_parser = ["anthropic", "scripted"])]
    pub provider: Option<String>,

    /// Model to use
    #[arg(long)]
    pub model: Option<String>,
}

/// Run the chat command.
pub async fn run(args: ChatArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(provider) = &args.provider {
        config.model.provider = parse_provider(provider)?;
    }
    if let Some(model) = args.model {
        config.model.model = model;
    }
    config.validate()?;

    let receptionist = build_receptionist(&config)?;
    let session = args
        .session
        .map(SessionId::new)
        .unwrap_or_else(SessionId::generate);

    Repl::new(receptionist, session, config.clinic.name.clone())
        .run()
        .await
}
