use crate::application::errors::HandlerError;
use crate::domain::entities::{Event, OutboundMessage, UserInfo};

/// The contract every command plugin must implement.
///
/// The dispatcher treats handlers uniformly through this trait: it never knows
/// what a plugin does, only that it can be started once, named, and asked to
/// turn an event into zero or more replies.
pub trait Handler: Send + Sync {
    /// One-time initialization, called exactly once before the handler is
    /// ever dispatched to. A failure here excludes the handler from the
    /// active set; it is not retried.
    ///
    /// Runs while the loader still holds the only reference, so plugins can
    /// store configuration (environment credentials, compiled state) directly.
    fn start(&mut self) -> Result<(), HandlerError>;

    /// Stable identifier for logging and diagnostics. Duplicates across
    /// plugins are a configuration smell, not an error.
    fn name(&self) -> &str;

    /// Produce replies for one inbound event, given the bot's own identity.
    ///
    /// Must be safe to call repeatedly and concurrently with other handlers'
    /// calls. An error fails this invocation only; the handler stays active
    /// for future events.
    fn execute(
        &self,
        event: &Event,
        bot_user: &UserInfo,
    ) -> Result<Vec<OutboundMessage>, HandlerError>;
}
