//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Plugin loading errors.
///
/// Only [`PluginError::Directory`] escapes the loader; every other variant is
/// a per-artifact failure that gets logged and skipped so one broken plugin
/// cannot keep the rest from loading.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Failed to read plugin directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load library: {0}")]
    Load(String),

    #[error("Entry symbol not found: {0}")]
    Symbol(String),

    #[error("Unexpected value from plugin entry point: {0}")]
    Instantiate(String),

    #[error("Plugin start failed: {0}")]
    Start(#[from] HandlerError),
}

/// Errors produced inside a handler's own lifecycle or execution
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Environment variable {0} not set")]
    MissingEnv(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Command failed: {0}")]
    Command(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
