//! Telegram messaging transport
//!
//! Long-polls the Bot API and converts updates into [`InboundEvent`]s.

mod client;
pub mod types;

pub use client::{TelegramClient, DEFAULT_API_BASE};

use crate::runtime::InboundEvent;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use types::{Message, Update, User};

/// Pause after a failed poll before trying again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Bot API error: {description}")]
    Api { status: u16, description: String },
    #[error("Bot API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode Bot API response: {0}")]
    Decode(String),
}

impl TelegramError {
    /// HTTP status to report upstream, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            TelegramError::Status { status, .. } | TelegramError::Api { status, .. } => Some(*status),
            TelegramError::Http(e) => e.status().as_ref().map(reqwest::StatusCode::as_u16),
            TelegramError::Decode(_) => None,
        }
    }
}

fn sender_label(user: Option<&User>, chat_id: i64) -> String {
    user.and_then(|u| u.username.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("User{chat_id}"))
}

fn message_event(message: Message) -> Option<InboundEvent> {
    let chat_id = message.chat.id;
    let sender = sender_label(message.from.as_ref(), chat_id);

    if let Some(voice) = message.voice {
        return Some(InboundEvent::VoiceMessage {
            chat_id,
            sender,
            attachment: voice.file_id,
        });
    }
    if message.is_command() {
        return None;
    }
    message.text.map(|text| InboundEvent::TextMessage {
        chat_id,
        sender,
        text,
    })
}

/// Convert a raw update; `None` for anything the bot does not handle
pub fn to_inbound(update: Update) -> Option<InboundEvent> {
    if let Some(message) = update.message {
        return message_event(message);
    }

    let query = update.callback_query?;
    let Some(chat_id) = query.message.as_ref().map(|m| m.chat.id) else {
        tracing::debug!(callback_id = %query.id, "Callback without message, skipping");
        return None;
    };
    Some(InboundEvent::ButtonPress {
        chat_id,
        sender: sender_label(Some(&query.from), chat_id),
        action_id: query.data.unwrap_or_default(),
        event_id: query.id,
    })
}

/// Long-poll loop feeding `tx` until cancelled or the receiver goes away.
///
/// Poll failures are logged and retried after a fixed delay.
pub async fn poll_updates(
    client: TelegramClient,
    poll_timeout: Duration,
    tx: mpsc::Sender<InboundEvent>,
    cancel: CancellationToken,
) {
    let mut offset = 0;
    tracing::info!(timeout_secs = poll_timeout.as_secs(), "Polling for updates");

    loop {
        let updates = tokio::select! {
            () = cancel.cancelled() => break,
            result = client.get_updates(offset, poll_timeout) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, retrying");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(POLL_RETRY_DELAY) => continue,
                }
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let update_id = update.update_id;
            let Some(event) = to_inbound(update) else {
                tracing::trace!(update_id, "Skipping unsupported update");
                continue;
            };
            if tx.send(event).await.is_err() {
                tracing::info!("Event consumer closed, stopping poller");
                return;
            }
        }
    }

    tracing::info!("Update poller stopped");
}
