//! The shared text-command pattern
//!
//! Most plugins are "if the text matches, reply with something". This trait
//! carries the event plumbing around that pattern once, so a plugin supplies
//! only its matcher and its text-in/text-out command function.

use regex_lite::Regex;

use crate::application::errors::HandlerError;
use crate::domain::entities::{Event, EventPayload, OutboundMessage, UserInfo};

/// Base behavior for text-command plugins.
///
/// Implementors provide [`matcher`](TextCommand::matcher) and
/// [`run`](TextCommand::run); the provided
/// [`handle_event`](TextCommand::handle_event) turns them into a full
/// [`Handler::execute`](crate::domain::traits::Handler::execute) body.
pub trait TextCommand {
    /// Pattern that gates whether this command reacts to a message at all.
    fn matcher(&self) -> &Regex;

    /// The command itself: message text in, reply text out. An empty reply
    /// means "matched, but nothing to say" and produces no message.
    fn run(&self, text: &str) -> Result<String, HandlerError>;

    /// The full match → filter → respond → wrap protocol.
    ///
    /// Non-message events and the bot's own messages are ignored without
    /// error; only [`run`](TextCommand::run) failures propagate.
    fn handle_event(
        &self,
        event: &Event,
        bot_user: &UserInfo,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        let EventPayload::Message(message) = event.payload() else {
            return Ok(Vec::new());
        };

        // Never reply to ourselves; that way lies an infinite loop.
        if message.user == bot_user.id() {
            return Ok(Vec::new());
        }

        if !self.matcher().is_match(&message.text) {
            return Ok(Vec::new());
        }

        let reply = self.run(&message.text)?;
        if reply.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![OutboundMessage::new(reply, message.channel.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MessageEvent;
    use serde_json::json;

    struct ImageCommand {
        matcher: Regex,
        reply: Result<String, String>,
    }

    impl ImageCommand {
        fn new(reply: Result<&str, &str>) -> Self {
            Self {
                matcher: Regex::new(r"(?i)\b(image)\b").unwrap(),
                reply: reply.map(String::from).map_err(String::from),
            }
        }
    }

    impl TextCommand for ImageCommand {
        fn matcher(&self) -> &Regex {
            &self.matcher
        }

        fn run(&self, _text: &str) -> Result<String, HandlerError> {
            self.reply
                .clone()
                .map_err(HandlerError::Command)
        }
    }

    fn message_event(text: &str, user: &str, channel: &str) -> Event {
        Event::new(
            "message",
            EventPayload::Message(MessageEvent {
                text: text.to_string(),
                channel: channel.to_string(),
                user: user.to_string(),
                ts: "1700000000.000100".to_string(),
            }),
        )
    }

    #[test]
    fn replies_to_matching_message_on_its_channel() {
        let command = ImageCommand::new(Ok("Cat - http://x/cat.png"));
        let event = message_event("image cat", "U42", "C1");

        let messages = command
            .handle_event(&event, &UserInfo::new("BOT1"))
            .unwrap();

        assert_eq!(
            messages,
            vec![OutboundMessage::new("Cat - http://x/cat.png", "C1")]
        );
    }

    #[test]
    fn ignores_own_messages() {
        let command = ImageCommand::new(Ok("Cat - http://x/cat.png"));
        let event = message_event("image cat", "BOT1", "C1");

        let messages = command
            .handle_event(&event, &UserInfo::new("BOT1"))
            .unwrap();

        assert!(messages.is_empty());
    }

    #[test]
    fn ignores_non_matching_text() {
        let command = ImageCommand::new(Ok("Cat - http://x/cat.png"));
        let event = message_event("hello there", "U42", "C1");

        let messages = command
            .handle_event(&event, &UserInfo::new("BOT1"))
            .unwrap();

        assert!(messages.is_empty());
    }

    #[test]
    fn ignores_non_message_events() {
        let command = ImageCommand::new(Ok("Cat - http://x/cat.png"));
        for event in [
            Event::new("hello", EventPayload::Hello),
            Event::new("goodbye", EventPayload::Goodbye),
            Event::from_json(json!({"type": "user_typing", "user": "U42"})),
        ] {
            let messages = command
                .handle_event(&event, &UserInfo::new("BOT1"))
                .unwrap();
            assert!(messages.is_empty(), "event {} produced a reply", event.name());
        }
    }

    #[test]
    fn matched_but_empty_reply_is_not_an_error() {
        let command = ImageCommand::new(Ok(""));
        let event = message_event("image", "U42", "C1");

        let messages = command
            .handle_event(&event, &UserInfo::new("BOT1"))
            .unwrap();

        assert!(messages.is_empty());
    }

    #[test]
    fn command_errors_propagate_without_messages() {
        let command = ImageCommand::new(Err("search backend down"));
        let event = message_event("image cat", "U42", "C1");

        let result = command.handle_event(&event, &UserInfo::new("BOT1"));

        match result {
            Err(HandlerError::Command(message)) => assert_eq!(message, "search backend down"),
            other => panic!("expected command error, got {:?}", other),
        }
    }

    #[test]
    fn classification_is_idempotent() {
        let command = ImageCommand::new(Ok("Cat - http://x/cat.png"));
        let bot = UserInfo::new("BOT1");
        let event = message_event("image cat", "U42", "C1");

        let first = command.handle_event(&event, &bot).unwrap();
        let second = command.handle_event(&event, &bot).unwrap();

        assert_eq!(first, second);
    }
}
