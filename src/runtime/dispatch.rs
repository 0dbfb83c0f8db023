//! Outbound response delivery

use super::Messenger;
use crate::exercises::Menu;
use crate::state_machine::{ChatId, Reply};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("delivery failed: {message}")]
pub struct DeliveryError {
    pub message: String,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One message to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub chat_id: ChatId,
    pub text: String,
    pub menu: Option<Menu>,
}

impl OutboundResponse {
    pub fn from_reply(chat_id: ChatId, reply: Reply) -> Self {
        Self {
            chat_id,
            text: reply.text,
            menu: reply.menu,
        }
    }
}

/// Delivers responses, at most once.
///
/// Failures are logged and swallowed: by the time a response is delivered
/// the session change behind it is already committed.
#[derive(Clone)]
pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
}

impl Dispatcher {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }

    /// Deliver one response; a rejected send is logged, not retried
    pub async fn deliver(&self, response: &OutboundResponse) {
        if let Err(e) = self
            .messenger
            .send(response.chat_id, &response.text, response.menu.as_ref())
            .await
        {
            tracing::warn!(
                chat_id = response.chat_id,
                buttons = response.menu.as_ref().map_or(0, |m| m.actions().count()),
                error = %e,
                "Failed to deliver response"
            );
        }
    }

    /// Acknowledge a button press; failures are logged only
    pub async fn acknowledge(&self, chat_id: ChatId, event_id: &str) {
        if let Err(e) = self.messenger.acknowledge(event_id).await {
            tracing::warn!(chat_id, event_id, error = %e, "Failed to acknowledge button press");
        }
    }
}
