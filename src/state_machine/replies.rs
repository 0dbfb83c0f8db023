//! Fixed bot texts

use crate::mood::Mood;

/// Substring of the lower-cased text that opens a dialogue
pub const GREETING_TRIGGER: &str = "привет";

pub const GREETING: &str = "Привет! 👋";
pub const HOW_ARE_YOU: &str = "Как ты сейчас?";
pub const TELL_ME_MORE: &str = "Расскажи мне побольше.";
pub const VOICE_APOLOGY: &str = "Извините, не удалось распознать голосовое сообщение.";

const ENERGIZED: &str = "Отлично! 💪 Такая энергия - это здорово! Держи этот настрой и используй его для достижения своих целей!";
const TIRED: &str = "Сожалею, что ты сейчас устал. Давай я предложу тебе 4 упражнения, которые помогут восстановиться.";
const POSITIVE: &str = "Рад слышать, что у тебя всё хорошо! 😊 Давай сохраним это настроение!";
const NEGATIVE: &str = "Мне жаль, что тебе сейчас нелегко. Давай я предложу тебе несколько упражнений, которые помогут улучшить настроение.";
const NEUTRAL_FINAL: &str = "Спасибо за ответ! Надеюсь, у тебя будет хороший день! 🌞";

/// Reply text for a resolved (or still neutral) mood
pub fn for_mood(mood: Mood) -> &'static str {
    match mood {
        Mood::Energized => ENERGIZED,
        Mood::Tired => TIRED,
        Mood::Positive => POSITIVE,
        Mood::Negative => NEGATIVE,
        Mood::Neutral => TELL_ME_MORE,
        Mood::NeutralFinal => NEUTRAL_FINAL,
    }
}
