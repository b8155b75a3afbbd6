//! Event dispatcher - fans events out to handlers, replies back to the provider

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::domain::entities::{Event, UserInfo};
use crate::domain::traits::ChatService;
use crate::infrastructure::plugins::HandlerSet;

/// Routes every inbound event to every active handler and forwards the
/// handlers' replies to the provider.
///
/// Handler `execute` is synchronous, so each call runs on a blocking task:
/// concurrently across handlers for one event, sequentially across events.
/// There is no per-call timeout; a handler that hangs stalls dispatch of
/// later events. That is a known limitation, not a bug to paper over here.
pub struct Dispatcher {
    handlers: HandlerSet,
}

impl Dispatcher {
    pub fn new(handlers: HandlerSet) -> Self {
        Self { handlers }
    }

    /// Consume the event stream until the provider closes it.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<Event>,
        chat: Arc<dyn ChatService>,
        bot_user: UserInfo,
    ) {
        info!(
            "Dispatching to {} handler(s): {}",
            self.handlers.len(),
            self.handlers.names().join(", ")
        );

        while let Some(event) = events.recv().await {
            self.dispatch(&event, chat.as_ref(), &bot_user).await;
        }

        info!("Event stream closed, dispatcher stopping");
    }

    /// Fan one event out to every handler and send whatever comes back.
    ///
    /// A handler error fails that invocation only; the handler stays in the
    /// set and sees the next event.
    async fn dispatch(&self, event: &Event, chat: &dyn ChatService, bot_user: &UserInfo) {
        debug!("Dispatching event: {}", event.name());

        let mut executions = Vec::with_capacity(self.handlers.len());
        for handler in self.handlers.iter() {
            let handler = Arc::clone(handler);
            let event = event.clone();
            let bot_user = bot_user.clone();
            executions.push(tokio::task::spawn_blocking(move || {
                let result = handler.execute(&event, &bot_user);
                (handler.name().to_string(), result)
            }));
        }

        for execution in executions {
            let (name, result) = match execution.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Handler task panicked: {}", e);
                    continue;
                }
            };

            let messages = match result {
                Ok(messages) => messages,
                Err(e) => {
                    error!("Handler {} failed on {}: {}", name, event.name(), e);
                    continue;
                }
            };

            for message in messages {
                if let Err(e) = chat.send(&message).await {
                    error!("Failed to send reply from {}: {}", name, e);
                }
            }
        }
    }
}
