//! Google image search command plugin
//!
//! Replies to `image <query>` (and friends) with the first image hit from the
//! Google Custom Search API. Built as a cdylib and loaded by the bot at
//! startup via `ultrabot_plugin_init`.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Deserialize;

use ultrabot::infrastructure::http::get_json;
use ultrabot::{Event, Handler, HandlerError, OutboundMessage, TextCommand, UserInfo};

const PATTERN: &str = r"(?i)\b(googleimages|gimages|image|gis)\b";
const GOOGLE_KEY_ENV: &str = "GOOGLE_KEY";
const GOOGLE_CX_ENV: &str = "GOOGLE_CX";
const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

static MATCHER: Lazy<Regex> =
    Lazy::new(|| Regex::new(PATTERN).expect("image command pattern compiles"));

/// Credentials are filled in by `start`; until then the handler is inert.
#[derive(Default)]
pub struct GoogleImages {
    key: String,
    cx: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

impl Handler for GoogleImages {
    fn start(&mut self) -> Result<(), HandlerError> {
        self.key = std::env::var(GOOGLE_KEY_ENV)
            .map_err(|_| HandlerError::MissingEnv(GOOGLE_KEY_ENV.to_string()))?;
        self.cx = std::env::var(GOOGLE_CX_ENV)
            .map_err(|_| HandlerError::MissingEnv(GOOGLE_CX_ENV.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "google-images"
    }

    fn execute(
        &self,
        event: &Event,
        bot_user: &UserInfo,
    ) -> Result<Vec<OutboundMessage>, HandlerError> {
        self.handle_event(event, bot_user)
    }
}

impl TextCommand for GoogleImages {
    fn matcher(&self) -> &Regex {
        &MATCHER
    }

    fn run(&self, text: &str) -> Result<String, HandlerError> {
        // First word is the trigger; the rest is the query.
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() < 2 {
            return Ok(String::new());
        }
        let query = words[1..].join(" ");

        let response: SearchResponse = get_json(
            SEARCH_URL,
            &[
                ("key", self.key.as_str()),
                ("cx", self.cx.as_str()),
                ("searchType", "image"),
                ("q", query.as_str()),
            ],
        )?;

        Ok(response
            .items
            .iter()
            .find(|item| !item.link.is_empty())
            .map(|item| format!("{} - {}", item.title, item.link))
            .unwrap_or_default())
    }
}

/// Plugin entry point. The loader takes ownership of the returned handler.
#[no_mangle]
#[allow(improper_ctypes_definitions)]
pub extern "C" fn ultrabot_plugin_init() -> *mut dyn Handler {
    let handler: Box<dyn Handler> = Box::new(GoogleImages::default());
    Box::into_raw(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultrabot::{EventPayload, MessageEvent};

    fn message_event(text: &str, user: &str) -> Event {
        Event::new(
            "message",
            EventPayload::Message(MessageEvent {
                text: text.to_string(),
                channel: "C1".to_string(),
                user: user.to_string(),
                ts: String::new(),
            }),
        )
    }

    #[test]
    fn matches_all_trigger_words() {
        for text in ["image cat", "IMAGE cat", "gis cat", "gimages cat", "googleimages cat"] {
            assert!(MATCHER.is_match(text), "{} should match", text);
        }
        for text in ["hello there", "imagery cat", "pilgrimages"] {
            assert!(!MATCHER.is_match(text), "{} should not match", text);
        }
    }

    #[test]
    fn trigger_without_query_replies_nothing() {
        let plugin = GoogleImages::default();
        // No query words means no API call and no reply.
        assert_eq!(plugin.run("image").unwrap(), "");
        assert_eq!(plugin.run("  gis  ").unwrap(), "");
    }

    #[test]
    fn ignores_its_own_messages() {
        let plugin = GoogleImages::default();
        let event = message_event("image cat", "BOT1");
        let messages = plugin.execute(&event, &UserInfo::new("BOT1")).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn ignores_non_matching_messages() {
        let plugin = GoogleImages::default();
        let event = message_event("hello there", "U42");
        let messages = plugin.execute(&event, &UserInfo::new("BOT1")).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn picks_first_item_with_a_link() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"items": [
                {"title": "No link"},
                {"title": "Cat", "link": "http://x/cat.png"},
                {"title": "Other cat", "link": "http://x/other.png"}
            ]}"#,
        )
        .unwrap();

        let reply = response
            .items
            .iter()
            .find(|item| !item.link.is_empty())
            .map(|item| format!("{} - {}", item.title, item.link))
            .unwrap_or_default();
        assert_eq!(reply, "Cat - http://x/cat.png");
    }

    #[test]
    fn empty_search_response_parses() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn start_requires_both_credentials() {
        // Single test so the env mutations don't race each other.
        std::env::remove_var(GOOGLE_KEY_ENV);
        std::env::remove_var(GOOGLE_CX_ENV);

        let mut plugin = GoogleImages::default();
        match plugin.start() {
            Err(HandlerError::MissingEnv(var)) => assert_eq!(var, GOOGLE_KEY_ENV),
            other => panic!("expected missing key, got {:?}", other),
        }

        std::env::set_var(GOOGLE_KEY_ENV, "test-key");
        match plugin.start() {
            Err(HandlerError::MissingEnv(var)) => assert_eq!(var, GOOGLE_CX_ENV),
            other => panic!("expected missing cx, got {:?}", other),
        }

        std::env::set_var(GOOGLE_CX_ENV, "test-cx");
        plugin.start().unwrap();

        std::env::remove_var(GOOGLE_KEY_ENV);
        std::env::remove_var(GOOGLE_CX_ENV);
    }
}
