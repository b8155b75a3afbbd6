//! Plugin system for ultrabot
//!
//! Plugins are dynamically loaded shared libraries. Each artifact must export
//! a single entry symbol that constructs a value implementing the
//! [`Handler`](crate::domain::traits::Handler) trait; the loader activates
//! each candidate and hands the surviving set to the dispatcher.

pub mod loader;
pub mod registry;

pub use loader::{LoadedPlugin, PluginInitFn, PluginLoader, PLUGIN_ENTRY_SYMBOL, PLUGIN_EXTENSION};
pub use registry::HandlerSet;
