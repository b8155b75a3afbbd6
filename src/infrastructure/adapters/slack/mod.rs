//! Slack adapter
//!
//! Bridges the Slack RTM connection to a typed, bounded event stream and
//! provides outbound send over the Web API.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

use crate::application::errors::BotError;
use crate::domain::entities::{Event, OutboundMessage, UserInfo};
use crate::domain::traits::ChatService;
use crate::infrastructure::config::MessageParams;

/// Slack Web API base URL
const API_BASE: &str = "https://slack.com/api";

/// Capacity of the buffer between the RTM relay and the dispatcher.
///
/// Bursts up to this size are absorbed; beyond it the relay blocks, tying
/// ingestion throughput to dispatch throughput on purpose.
const EVENT_BUFFER_SIZE: usize = 1024;

type RtmSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Deserialize)]
struct RtmConnectResponse {
    ok: bool,
    error: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthTestResponse {
    ok: bool,
    error: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    as_user: bool,
}

/// Slack bot adapter
pub struct SlackAdapter {
    token: String,
    params: MessageParams,
    client: Client,
}

impl SlackAdapter {
    pub fn new(token: impl Into<String>, params: MessageParams) -> Self {
        Self {
            token: token.into(),
            params,
            client: Client::new(),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", API_BASE, method)
    }

    async fn api_post<T>(&self, method: &str, body: &impl Serialize) -> Result<T, BotError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.api_url(method))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Slack API {} returned {}",
                method,
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ChatService for SlackAdapter {
    async fn listen(&mut self) -> Result<mpsc::Receiver<Event>, BotError> {
        let connect: RtmConnectResponse =
            self.api_post("rtm.connect", &serde_json::json!({})).await?;
        if !connect.ok {
            return Err(BotError::Auth(
                connect.error.unwrap_or_else(|| "rtm.connect failed".to_string()),
            ));
        }
        let ws_url = connect
            .url
            .ok_or_else(|| BotError::Parse("rtm.connect response missing url".to_string()))?;

        let (socket, _) = connect_async(ws_url.as_str())
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;
        info!("RTM connection established");

        let (events_tx, events_rx) = event_channel();
        tokio::spawn(relay_events(socket, events_tx));

        Ok(events_rx)
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), BotError> {
        let text = if self.params.escape_text {
            escape_text(message.text())
        } else {
            message.text().to_string()
        };

        let request = PostMessageRequest {
            channel: message.channel(),
            text: &text,
            as_user: self.params.as_user,
        };

        let response: PostMessageResponse =
            self.api_post("chat.postMessage", &request).await?;
        if !response.ok {
            return Err(BotError::Send(
                response
                    .error
                    .unwrap_or_else(|| "chat.postMessage failed".to_string()),
            ));
        }
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo, BotError> {
        let response: AuthTestResponse =
            self.api_post("auth.test", &serde_json::json!({})).await?;
        if !response.ok {
            return Err(BotError::Auth(
                response.error.unwrap_or_else(|| "auth.test failed".to_string()),
            ));
        }
        let id = response
            .user_id
            .ok_or_else(|| BotError::Parse("auth.test response missing user_id".to_string()))?;
        Ok(UserInfo::new(id))
    }
}

/// The bounded buffer between the RTM relay and the dispatcher.
fn event_channel() -> (mpsc::Sender<Event>, mpsc::Receiver<Event>) {
    mpsc::channel(EVENT_BUFFER_SIZE)
}

/// Background relay: raw RTM frames in, typed events out.
///
/// Runs until the socket closes or the consumer side of the buffer is
/// dropped. The bounded `send` is the backpressure point.
async fn relay_events(mut socket: RtmSocket, events: mpsc::Sender<Event>) {
    loop {
        let frame = match socket.next().await {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => {
                warn!("RTM socket error: {}", e);
                break;
            }
            None => break,
        };

        match frame {
            WsMessage::Text(text) => match serde_json::from_str::<Value>(text.as_str()) {
                Ok(raw) => {
                    if events.send(Event::from_json(raw)).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Undecodable RTM frame: {}", e),
            },
            WsMessage::Ping(payload) => {
                if socket.send(WsMessage::Pong(payload)).await.is_err() {
                    break;
                }
            }
            WsMessage::Close(_) => {
                info!("RTM connection closed by provider");
                break;
            }
            _ => {}
        }
    }
    info!("Event relay stopped");
}

/// Slack's required entity escaping for message text.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
