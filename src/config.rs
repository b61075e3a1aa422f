//! Configuration loading.
//!
//! `config.toml` names where the gateway lives and which environment
//! variables hold its credentials; the secrets themselves never live here.
//! Every section is optional and falls back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::preferences::SmsPreferences;
use crate::sms::DEFAULT_INSIGHTS_MAX_CHARS;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SMS account bridge settings.
    pub gateway: GatewayConfig,

    /// Default recipient and delivery preferences.
    pub sms: SmsPreferences,

    /// Message size limits.
    pub limits: LimitsConfig,
}

/// Where to reach the SMS account bridge and how to authenticate.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the bridge.
    pub base_url: String,

    /// Environment variable name holding the account identity.
    pub identity_env: String,

    /// Environment variable name holding the account secret.
    pub secret_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            identity_env: "GOOGLE_VOICE_EMAIL".to_owned(),
            secret_env: "GOOGLE_VOICE_PASSWORD".to_owned(),
        }
    }
}

/// Message size limits.
#[derive(Debug, Deserialize)]
pub struct LimitsConfig {
    /// Maximum insight characters carried in one digest.
    #[serde(default = "default_insights_max_chars")]
    pub insights_max_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            insights_max_chars: default_insights_max_chars(),
        }
    }
}

/// Default port the SMS bridge listens on.
pub const DEFAULT_BRIDGE_PORT: u16 = 3002;

fn default_base_url() -> String {
    format!("http://127.0.0.1:{DEFAULT_BRIDGE_PORT}")
}
fn default_insights_max_chars() -> usize {
    DEFAULT_INSIGHTS_MAX_CHARS
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Load configuration, falling back to defaults when `path` does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_or_default(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

/// Resolve the default config directory (`~/.tasksms/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".tasksms"))
}

/// Resolve the default config file (`~/.tasksms/config.toml`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
