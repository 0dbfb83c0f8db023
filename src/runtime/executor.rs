//! Per-chat runtime executor

use super::dispatch::{Dispatcher, OutboundResponse};
use super::{InboundEvent, Services};
use crate::journal::JournalEntry;
use crate::state_machine::replies::VOICE_APOLOGY;
use crate::state_machine::{transition, ChatId, ChatSession, Effect, Event, Reply};
use tokio::sync::{mpsc, watch};

/// Actor owning one chat's session.
///
/// Events are handled strictly in arrival order; a voice turn blocks only
/// this chat until its pipeline finishes.
pub struct ChatRuntime {
    chat_id: ChatId,
    session: ChatSession,
    services: Services,
    dispatcher: Dispatcher,
    event_rx: mpsc::UnboundedReceiver<InboundEvent>,
    state_tx: watch::Sender<ChatSession>,
}

impl ChatRuntime {
    pub fn new(
        chat_id: ChatId,
        services: Services,
        event_rx: mpsc::UnboundedReceiver<InboundEvent>,
        state_tx: watch::Sender<ChatSession>,
    ) -> Self {
        let dispatcher = Dispatcher::new(services.messenger.clone());
        Self {
            chat_id,
            session: ChatSession::idle(),
            services,
            dispatcher,
            event_rx,
            state_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(chat_id = self.chat_id, "Starting chat runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event).await;
        }

        tracing::debug!(chat_id = self.chat_id, phase = self.session.phase.as_str(), "Chat runtime stopped");
    }

    async fn process_event(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::TextMessage { sender, text, .. } => {
                self.apply(&sender, Event::text(text)).await;
            }
            InboundEvent::VoiceMessage {
                sender, attachment, ..
            } => match self.services.pipeline.transcribe(&attachment).await {
                Ok(transcript) => self.apply(&sender, Event::transcript(transcript)).await,
                Err(e) => {
                    // The session is left untouched
                    tracing::warn!(
                        chat_id = self.chat_id,
                        stage = e.stage(),
                        error = %e,
                        "Voice message failed"
                    );
                    let apology = OutboundResponse::from_reply(self.chat_id, Reply::text(VOICE_APOLOGY));
                    self.dispatcher.deliver(&apology).await;
                }
            },
            InboundEvent::ButtonPress {
                sender,
                action_id,
                event_id,
                ..
            } => {
                self.apply(&sender, Event::button(action_id)).await;
                self.dispatcher.acknowledge(self.chat_id, &event_id).await;
            }
        }
    }

    /// Run one transition: commit the new session, then execute its effects
    async fn apply(&mut self, sender: &str, event: Event) {
        let result = transition(&self.session, &self.services.lexicon, event);
        if result.is_ignored() {
            tracing::trace!(chat_id = self.chat_id, "Input ignored");
            return;
        }

        // Committed before delivery; a failed send does not roll it back
        let old = std::mem::replace(&mut self.session, result.new_state);
        debug_assert!(self.session.is_valid(), "invalid session {:?}", self.session);
        self.state_tx.send_replace(self.session);

        if let Some(mood) = result.mood {
            tracing::info!(
                chat_id = self.chat_id,
                mood = mood.as_str(),
                attempts = self.session.mood_attempts,
                terminal = mood.is_terminal(),
                from = old.phase.as_str(),
                to = self.session.phase.as_str(),
                "Mood resolved"
            );
        } else if old != self.session {
            tracing::debug!(
                chat_id = self.chat_id,
                from = old.phase.as_str(),
                to = self.session.phase.as_str(),
                "Phase changed"
            );
        }

        for effect in result.effects {
            self.execute_effect(sender, effect).await;
        }
    }

    async fn execute_effect(&self, sender: &str, effect: Effect) {
        match effect {
            Effect::Send(reply) => {
                let response = OutboundResponse::from_reply(self.chat_id, reply);
                self.dispatcher.deliver(&response).await;
            }
            Effect::Record {
                kind,
                content,
                response,
                mood,
            } => {
                let Some(journal) = &self.services.journal else {
                    return;
                };
                let entry = JournalEntry::new(self.chat_id, sender, kind, content, response, mood);
                if let Err(e) = journal.record(&entry).await {
                    tracing::warn!(chat_id = self.chat_id, error = %e, "Failed to write journal entry");
                }
            }
        }
    }
}
