//! Domain entities - Core objects handed to and produced by handlers

pub mod event;
pub mod message;
pub mod user;

pub use event::{Event, EventPayload, MessageEvent};
pub use message::OutboundMessage;
pub use user::UserInfo;
