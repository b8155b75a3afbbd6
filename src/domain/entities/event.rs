use serde::Deserialize;
use serde_json::Value;

/// One inbound occurrence from the messaging provider.
///
/// The payload is decoded into a typed variant at the Slack boundary; handlers
/// never see raw wire JSON unless the event type is one we don't model.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    payload: EventPayload,
}

/// Typed payload, keyed by the provider's event-type tag.
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// A chat message posted to a channel.
    Message(MessageEvent),
    /// Sent by the provider once the event stream is open.
    Hello,
    /// The provider is about to close the connection.
    Goodbye,
    /// Any event type we don't decode further. Keeps the stream lossless.
    Other(Value),
}

/// Payload of a `message` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub ts: String,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Decode a raw provider event. Never fails: an unrecognized or malformed
    /// payload falls back to [`EventPayload::Other`] so one odd frame can't
    /// take the stream down.
    pub fn from_json(raw: Value) -> Self {
        let name = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let payload = match name.as_str() {
            "message" => match serde_json::from_value::<MessageEvent>(raw.clone()) {
                Ok(message) => EventPayload::Message(message),
                Err(_) => EventPayload::Other(raw),
            },
            "hello" => EventPayload::Hello,
            "goodbye" => EventPayload::Goodbye,
            _ => EventPayload::Other(raw),
        };

        Self { name, payload }
    }

    /// The provider's event-type tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// The message payload, if this is a message event.
    pub fn message(&self) -> Option<&MessageEvent> {
        match &self.payload {
            EventPayload::Message(message) => Some(message),
            _ => None,
        }
    }
}
