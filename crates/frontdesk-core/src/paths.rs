//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::PathBuf;

/// Name of the config file inside the base directory.
pub const CONFIG_FILE_NAME: &str = "frontdesk.json5";

/// Get the Frontdesk base directory.
///
/// `FRONTDESK_HOME` wins when set; otherwise `~/.frontdesk`.
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(env::vars::FRONTDESK_HOME) {
        return Ok(expand_tilde(&home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".frontdesk"))
}

/// Get the config file path.
///
/// `FRONTDESK_CONFIG` overrides the default `<base>/frontdesk.json5`.
pub fn config_file() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::get_var(env::vars::FRONTDESK_CONFIG) {
        return Ok(expand_tilde(&path));
    }
    Ok(base_dir()?.join(CONFIG_FILE_NAME))
}

/// Ensure the base directory exists.
pub fn ensure_dirs() -> Result<(), ConfigError> {
    std::fs::create_dir_all(base_dir()?)?;
    Ok(())
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
