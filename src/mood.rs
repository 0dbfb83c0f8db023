//! Mood classification
//!
//! A mood is derived from free text by ordered lexicon lookup: the first
//! category (energized, tired, positive, negative) owning a pattern that is
//! a substring of the text wins, otherwise the text is neutral.

mod lexicon;


pub use lexicon::Lexicon;

use serde::{Deserialize, Serialize};

/// Number of consecutive unresolved probes after which a neutral answer is
/// accepted as final.
pub const NEUTRAL_PROMOTION_THRESHOLD: u32 = 3;

/// Discrete emotional state of the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Energized,
    Tired,
    Positive,
    Negative,
    Neutral,
    /// Never produced by [`classify`]; the state machine promotes `Neutral`
    /// to this once the attempt threshold is reached.
    NeutralFinal,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Energized => "energized",
            Mood::Tired => "tired",
            Mood::Positive => "positive",
            Mood::Negative => "negative",
            Mood::Neutral => "neutral",
            Mood::NeutralFinal => "neutral_final",
        }
    }

    /// Whether this mood ends the probing sub-dialogue
    pub fn is_terminal(self) -> bool {
        !matches!(self, Mood::Neutral)
    }

    /// Whether the reply to this mood carries the exercise menu
    pub fn offers_exercises(self) -> bool {
        matches!(self, Mood::Tired | Mood::Negative)
    }

    /// Apply the neutral promotion rule for the given attempt count
    pub fn promote(self, attempts: u32) -> Self {
        if self == Mood::Neutral && attempts >= NEUTRAL_PROMOTION_THRESHOLD {
            Mood::NeutralFinal
        } else {
            self
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify already lower-cased text.
///
/// Total and pure: any string maps to exactly one of the first five moods,
/// and overlapping lexicons resolve by category priority.
pub fn classify(lexicon: &Lexicon, text: &str) -> Mood {
    lexicon
        .categories()
        .into_iter()
        .find(|(_, patterns)| patterns.iter().any(|p| text.contains(p.as_str())))
        .map_or(Mood::Neutral, |(mood, _)| mood)
}
