//! Domain traits - Abstractions for plugins and the messaging provider

pub mod chat;
pub mod handler;

pub use chat::ChatService;
pub use handler::Handler;
