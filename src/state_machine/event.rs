//! Events that drive session transitions

/// Input to the state machine for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Text typed by the user
    Text { text: String },
    /// Text recognized from a voice message
    Transcript { text: String },
    /// Menu button pressed
    ButtonPress { action_id: String },
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }

    pub fn transcript(text: impl Into<String>) -> Self {
        Event::Transcript { text: text.into() }
    }

    pub fn button(action_id: impl Into<String>) -> Self {
        Event::ButtonPress {
            action_id: action_id.into(),
        }
    }
}
