//! Runtime for driving chat dialogues
//!
//! One actor per chat owns that chat's session and consumes its events in
//! order. Different chats proceed independently, so a slow voice turn only
//! holds up its own chat.

mod dispatch;
mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use dispatch::{DeliveryError, Dispatcher, OutboundResponse};
pub use executor::ChatRuntime;
pub use traits::*;

use crate::mood::Lexicon;
use crate::speech::VoicePipeline;
use crate::state_machine::{ChatId, ChatSession, Phase};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, RwLock};
use tokio_util::sync::CancellationToken;

/// Inbound update from the messaging platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextMessage {
        chat_id: ChatId,
        sender: String,
        text: String,
    },
    VoiceMessage {
        chat_id: ChatId,
        sender: String,
        attachment: String,
    },
    ButtonPress {
        chat_id: ChatId,
        sender: String,
        action_id: String,
        event_id: String,
    },
}

impl InboundEvent {
    pub fn chat_id(&self) -> ChatId {
        match self {
            InboundEvent::TextMessage { chat_id, .. }
            | InboundEvent::VoiceMessage { chat_id, .. }
            | InboundEvent::ButtonPress { chat_id, .. } => *chat_id,
        }
    }

    pub fn sender(&self) -> &str {
        match self {
            InboundEvent::TextMessage { sender, .. }
            | InboundEvent::VoiceMessage { sender, .. }
            | InboundEvent::ButtonPress { sender, .. } => sender,
        }
    }
}

/// Collaborators shared by every chat runtime
#[derive(Clone)]
pub struct Services {
    pub messenger: Arc<dyn Messenger>,
    pub journal: Option<Arc<dyn Journal>>,
    pub pipeline: Arc<VoicePipeline>,
    pub lexicon: Arc<Lexicon>,
}

/// Handle to interact with a running chat
pub struct ChatHandle {
    pub event_tx: mpsc::UnboundedSender<InboundEvent>,
    pub state_rx: watch::Receiver<ChatSession>,
}

/// Manager for all chat runtimes
pub struct RuntimeManager {
    services: Services,
    runtimes: RwLock<HashMap<ChatId, ChatHandle>>,
}

impl RuntimeManager {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the runtime for a chat.
    ///
    /// Chats start `Idle`; runtimes live as long as the manager.
    pub async fn get_or_create(&self, chat_id: ChatId) -> mpsc::UnboundedSender<InboundEvent> {
        // Check if already running
        {
            let runtimes = self.runtimes.read().await;
            if let Some(handle) = runtimes.get(&chat_id) {
                return handle.event_tx.clone();
            }
        }

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have won the race for the write lock
        if let Some(handle) = runtimes.get(&chat_id) {
            return handle.event_tx.clone();
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ChatSession::idle());

        let runtime = ChatRuntime::new(chat_id, self.services.clone(), event_rx, state_tx);
        tokio::spawn(async move {
            runtime.run().await;
            tracing::debug!(chat_id, "Chat runtime finished");
        });

        runtimes.insert(
            chat_id,
            ChatHandle {
                event_tx: event_tx.clone(),
                state_rx,
            },
        );
        tracing::debug!(chat_id, chats = runtimes.len(), "Started chat runtime");
        event_tx
    }

    /// Route an event to its chat's runtime
    pub async fn dispatch(&self, event: InboundEvent) {
        let chat_id = event.chat_id();
        tracing::debug!(chat_id, sender = event.sender(), "Dispatching event");
        let event_tx = self.get_or_create(chat_id).await;
        if event_tx.send(event).is_err() {
            tracing::error!(chat_id, "Chat runtime is gone, dropping event");
        }
    }

    /// Consume events until the source closes or `cancel` fires
    pub async fn run(&self, mut events: mpsc::Receiver<InboundEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Shutdown requested, no longer accepting events");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event).await,
                    None => break,
                },
            }
        }
        let chats = self.chat_count().await;
        let open_dialogues = self.open_dialogues().await;
        tracing::info!(chats, open_dialogues, "Runtime manager stopped");
    }

    /// Chats whose last committed session is not `Idle`
    pub async fn open_dialogues(&self) -> usize {
        let runtimes = self.runtimes.read().await;
        runtimes
            .values()
            .filter(|h| h.state_rx.borrow().phase != Phase::Idle)
            .count()
    }

    /// Last committed session for a chat; `None` if the chat was never seen
    #[cfg(test)]
    pub async fn session(&self, chat_id: ChatId) -> Option<ChatSession> {
        let runtimes = self.runtimes.read().await;
        runtimes.get(&chat_id).map(|h| *h.state_rx.borrow())
    }

    /// Watch a chat's committed session
    #[cfg(test)]
    pub async fn subscribe(&self, chat_id: ChatId) -> watch::Receiver<ChatSession> {
        self.get_or_create(chat_id).await;
        let runtimes = self.runtimes.read().await;
        match runtimes.get(&chat_id) {
            Some(handle) => handle.state_rx.clone(),
            // Runtimes are never removed once created
            None => watch::channel(ChatSession::idle()).1,
        }
    }

    pub async fn chat_count(&self) -> usize {
        self.runtimes.read().await.len()
    }
}
