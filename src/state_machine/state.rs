//! Chat session state

/// Conversation identifier assigned by the messaging platform
pub type ChatId = i64;

/// Position in the greeting -> mood probe -> resolution dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingMood,
    AwaitingExercise,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingMood => "awaiting_mood",
            Phase::AwaitingExercise => "awaiting_exercise",
        }
    }
}

/// State of one conversation.
///
/// A chat with no session yet is equivalent to `ChatSession::default()`.
/// `mood_attempts` is only non-zero while `phase == AwaitingMood`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatSession {
    pub phase: Phase,
    pub mood_attempts: u32,
}

impl ChatSession {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn awaiting_mood(mood_attempts: u32) -> Self {
        Self {
            phase: Phase::AwaitingMood,
            mood_attempts,
        }
    }

    pub fn awaiting_exercise() -> Self {
        Self {
            phase: Phase::AwaitingExercise,
            mood_attempts: 0,
        }
    }

    /// Attempts counted so far in the current probe
    pub fn current_attempts(&self) -> u32 {
        if self.phase == Phase::AwaitingMood {
            self.mood_attempts
        } else {
            0
        }
    }

    pub fn is_valid(&self) -> bool {
        self.phase == Phase::AwaitingMood || self.mood_attempts == 0
    }
}
