//! Effects produced by state transitions

use crate::exercises::Menu;
use crate::journal::MessageKind;
use crate::mood::Mood;

/// A message to deliver to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub menu: Option<Menu>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu: None,
        }
    }

    pub fn with_exercises(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu: Some(Menu::exercises()),
        }
    }
}

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a message to the chat
    Send(Reply),

    /// Append a record of this turn to the conversation journal
    Record {
        kind: MessageKind,
        content: String,
        response: String,
        mood: Option<Mood>,
    },
}

impl Effect {
    pub fn send_text(text: impl Into<String>) -> Self {
        Effect::Send(Reply::text(text))
    }

    pub fn send_with_exercises(text: impl Into<String>) -> Self {
        Effect::Send(Reply::with_exercises(text))
    }

    pub fn as_reply(&self) -> Option<&Reply> {
        match self {
            Effect::Send(reply) => Some(reply),
            Effect::Record { .. } => None,
        }
    }
}
