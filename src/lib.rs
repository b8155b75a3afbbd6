//! ultrabot - a Slack bot that gets its commands from dynamically loaded plugins
//!
//! The library surface exists for plugin authors: a plugin crate links against
//! `ultrabot` for the [`Handler`] contract, the entity types it is handed, and
//! the [`TextCommand`] helper that covers the common text-command pattern.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::commands::TextCommand;
pub use application::errors::{BotError, HandlerError, PluginError};
pub use domain::entities::{Event, EventPayload, MessageEvent, OutboundMessage, UserInfo};
pub use domain::traits::{ChatService, Handler};
