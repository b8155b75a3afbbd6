/// One outbound reply unit: what to say and where to say it.
///
/// Created by a handler, owned by it until handed to the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    text: String,
    channel: String,
    user_id: Option<String>,
}

impl OutboundMessage {
    pub fn new(text: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel: channel.into(),
            user_id: None,
        }
    }

    /// Attribute the message to a specific user id, for providers that care.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
