//! Configuration management commands.

use super::load_config;
use anyhow::{anyhow, bail};
use clap::Args;
use frontdesk_core::config::Config;
use frontdesk_core::{paths, ConfigError};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Set a configuration value in the config file
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config(config_path)?;
            println!("{}", serde_json::to_string_pretty(&redacted(&config)?)?);
        }

        ConfigCommand::Get { key } => {
            let config = load_config(config_path)?;
            let json = redacted(&config)?;
            match get_path(&json, &key) {
                Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
                None => bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Set { key, value } => {
            let path = file_path(config_path)?;
            // Edit the file as written, without environment overrides.
            let config = match Config::load(&path) {
                Ok(config) => config,
                Err(ConfigError::NotFound(_)) => Config::default(),
                Err(e) => return Err(e.into()),
            };

            let updated = set_path(&config, &key, &value)?;
            updated.validate()?;
            updated.save(&path)?;

            println!("Set {} = {}", key, value);
        }

        ConfigCommand::Init { force } => {
            let path = file_path(config_path)?;
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            Config::default().save(&path)?;
            println!("Created config file: {}", path.display());
        }

        ConfigCommand::Path => {
            println!("{}", file_path(config_path)?.display());
        }

        ConfigCommand::Validate => {
            let config = load_config(config_path)?;
            match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => bail!("{}", e),
            }
        }
    }

    Ok(())
}

fn file_path(config_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// The config as JSON with the API key replaced by its hint.
fn redacted(config: &Config) -> anyhow::Result<Value> {
    let mut json = serde_json::to_value(config)?;
    if let Some(key) = &config.model.api_key {
        json["model"]["api_key"] = Value::String(key.hint());
    }
    Ok(json)
}

fn get_path<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |value, part| value.get(part))
}

/// Set the dot-separated `key` to `value` and check the result still fits
/// the config schema. `value` is parsed as JSON, falling back to a string.
fn set_path(config: &Config, key: &str, value: &str) -> anyhow::Result<Config> {
    let mut json = serde_json::to_value(config)?;
    let parts: Vec<&str> = key.split('.').collect();

    let mut current = &mut json;
    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            let parsed: Value =
                serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
            current[*part] = parsed;
        } else {
            if !current.get(*part).is_some_and(Value::is_object) {
                current[*part] = serde_json::json!({});
            }
            current = &mut current[*part];
        }
    }

    serde_json::from_value(json).map_err(|e| anyhow!("Invalid configuration after set: {}", e))
}
