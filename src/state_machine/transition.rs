//! Pure state transition function

use super::replies::{self, GREETING, GREETING_TRIGGER, HOW_ARE_YOU};
use super::{ChatSession, Effect, Event, Phase};
use crate::exercises::Exercise;
use crate::journal::MessageKind;
use crate::mood::{classify, Lexicon, Mood};

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ChatSession,
    pub effects: Vec<Effect>,
    /// Mood resolved during this turn, if the turn was a mood probe
    pub mood: Option<Mood>,
}

impl TransitionResult {
    pub fn new(state: ChatSession) -> Self {
        Self {
            new_state: state,
            effects: vec![],
            mood: None,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Append a journal record whose response is every reply queued so far
    fn recorded(self, kind: MessageKind, content: String) -> Self {
        let response = self.reply_texts().join("\n");
        let mood = self.mood;
        self.with_effect(Effect::Record {
            kind,
            content,
            response,
            mood,
        })
    }

    pub fn reply_texts(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(Effect::as_reply)
            .map(|r| r.text.as_str())
            .collect()
    }

    /// Whether the turn produced nothing at all
    pub fn is_ignored(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Pure transition function.
///
/// Never fails: input that has no meaning in the current phase leaves the
/// session untouched and produces no effects.
pub fn transition(session: &ChatSession, lexicon: &Lexicon, event: Event) -> TransitionResult {
    match event {
        // Menu selection works in any phase and never moves the dialogue
        Event::ButtonPress { action_id } => press_button(session, action_id),

        // Voice is always mood-classified, whatever the phase
        Event::Transcript { text } => {
            resolve_mood(session, lexicon, MessageKind::Voice, text.to_lowercase())
        }

        Event::Text { text } => {
            let text = text.to_lowercase();
            match session.phase {
                Phase::AwaitingMood => resolve_mood(session, lexicon, MessageKind::Text, text),
                Phase::Idle | Phase::AwaitingExercise if text.contains(GREETING_TRIGGER) => {
                    greet(text)
                }
                Phase::Idle | Phase::AwaitingExercise => TransitionResult::new(*session),
            }
        }
    }
}

fn greet(text: String) -> TransitionResult {
    TransitionResult::new(ChatSession::awaiting_mood(0))
        .with_effect(Effect::send_text(GREETING))
        .with_effect(Effect::send_text(HOW_ARE_YOU))
        .recorded(MessageKind::Text, text)
}

fn resolve_mood(
    session: &ChatSession,
    lexicon: &Lexicon,
    kind: MessageKind,
    text: String,
) -> TransitionResult {
    let attempts = session.current_attempts() + 1;
    let mood = classify(lexicon, &text).promote(attempts);
    let reply = replies::for_mood(mood);

    let new_state = match mood {
        Mood::Neutral => ChatSession::awaiting_mood(attempts),
        Mood::Tired => ChatSession::awaiting_exercise(),
        Mood::Energized | Mood::Positive | Mood::Negative | Mood::NeutralFinal => ChatSession::idle(),
    };
    let effect = if mood.offers_exercises() {
        Effect::send_with_exercises(reply)
    } else {
        Effect::send_text(reply)
    };

    TransitionResult::new(new_state)
        .with_mood(mood)
        .with_effect(effect)
        .recorded(kind, text)
}

fn press_button(session: &ChatSession, action_id: String) -> TransitionResult {
    let result = TransitionResult::new(*session);
    let result = match Exercise::from_action_id(&action_id) {
        Some(exercise) => result.with_effect(Effect::send_text(exercise.instructions())),
        None => result,
    };
    result.recorded(MessageKind::Callback, action_id)
}
