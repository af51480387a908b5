//! Bot configuration loaded from a TOML settings file.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid TOML for [`BotConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
///
/// Every key is optional; missing keys fall back to the documented
/// defaults. Without both `oauth` and `username` the bot logs in
/// anonymously, which is read-only: it can observe chat but the server
/// ignores anything it says.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Chat server host (default `irc.twitch.tv`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Chat server port (default `6667`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer token presented before the nickname (`oauth:...`).
    #[serde(default)]
    pub oauth: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Channel to join, without the leading `#` (default `twitch`).
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Leading characters marking chat text as a command invocation
    /// (default `!`).
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Login names allowed to run admin-gated commands.
    #[serde(default)]
    pub admins: Vec<String>,
}

impl BotConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: BotConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// The channel in wire form: lowercased, `#` prepended.
    pub fn channel_name(&self) -> String {
        format!("#{}", self.channel.trim_start_matches('#').to_ascii_lowercase())
    }

    /// Whether `user` may run admin-gated commands.
    pub fn is_admin(&self, user: &str) -> bool {
        self.admins.iter().any(|admin| admin == user)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            oauth: None,
            username: None,
            channel: default_channel(),
            prefix: default_prefix(),
            admins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "irc.twitch.tv".to_string()
}

fn default_port() -> u16 {
    6667
}

fn default_channel() -> String {
    "twitch".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}
