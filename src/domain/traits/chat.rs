use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{Event, OutboundMessage, UserInfo};

/// Abstraction over the messaging provider connection.
///
/// The dispatcher only needs three capabilities: a stream of typed events, an
/// outbound send, and the bot's own identity.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Open the connection and return the event stream.
    ///
    /// The returned channel is bounded; when the consumer falls behind, the
    /// provider-side relay blocks rather than dropping events or buffering
    /// without limit.
    async fn listen(&mut self) -> Result<mpsc::Receiver<Event>, BotError>;

    /// Publish one message to its channel. Provider failures are passed
    /// through; no retry at this layer.
    async fn send(&self, message: &OutboundMessage) -> Result<(), BotError>;

    /// Resolve the authenticated bot account, typically once at startup.
    async fn user_info(&self) -> Result<UserInfo, BotError>;
}
