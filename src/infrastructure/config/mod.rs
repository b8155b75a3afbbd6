//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub slack: SlackConfig,
    pub plugins: PluginConfig,
    pub messages: MessageParams,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlackConfig {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginConfig {
    pub directory: PathBuf,
}

/// Outbound send parameters, passed into the adapter at construction.
///
/// One value, injected where it is used; nothing reads these from ambient
/// package state.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessageParams {
    pub as_user: bool,
    pub escape_text: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "ultrabot".to_string(),
            },
            slack: SlackConfig { token: None },
            plugins: PluginConfig {
                directory: PathBuf::from("./plugins"),
            },
            messages: MessageParams::default(),
        }
    }
}

impl Default for MessageParams {
    fn default() -> Self {
        Self {
            as_user: true,
            escape_text: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults plus whatever the environment supplies.
    pub fn load_env() -> Self {
        let mut config = Self::default();
        config.slack.token = std::env::var("SLACK_TOKEN").ok();
        config
    }

    /// Resolve the Slack token: explicit override, then config, then env.
    pub fn resolve_token(&self, override_token: Option<String>) -> Result<String, ConfigError> {
        override_token
            .or_else(|| self.slack.token.clone())
            .or_else(|| std::env::var("SLACK_TOKEN").ok())
            .ok_or_else(|| ConfigError::MissingField("slack.token".to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
