//! Substring lexicons for mood classification

use super::Mood;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lexicon: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Four ordered pattern sets, immutable once built.
///
/// Patterns are stored lower-cased, trimmed and de-duplicated (first
/// occurrence wins). Empty patterns are dropped since they would match
/// every text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    energized: Vec<String>,
    tired: Vec<String>,
    positive: Vec<String>,
    negative: Vec<String>,
}

/// On-disk shape of a lexicon file
#[derive(Debug, Deserialize)]
struct LexiconFile {
    energized: Vec<String>,
    tired: Vec<String>,
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Lexicon {
    pub fn new<E, T, P, N>(energized: E, tired: T, positive: P, negative: N) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            energized: normalize(energized),
            tired: normalize(tired),
            positive: normalize(positive),
            negative: normalize(negative),
        }
    }

    /// The lexicon shipped with the bot
    pub fn builtin() -> Self {
        Self::new(ENERGIZED, TIRED, POSITIVE, NEGATIVE)
    }

    /// Parse a JSON document with `energized`, `tired`, `positive` and
    /// `negative` string arrays.
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(json)?;
        Ok(Self::new(file.energized, file.tired, file.positive, file.negative))
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Patterns for a category; the neutral moods own none.
    pub fn patterns(&self, mood: Mood) -> &[String] {
        match mood {
            Mood::Energized => &self.energized,
            Mood::Tired => &self.tired,
            Mood::Positive => &self.positive,
            Mood::Negative => &self.negative,
            Mood::Neutral | Mood::NeutralFinal => &[],
        }
    }

    /// Categories in classification priority order
    pub(super) fn categories(&self) -> [(Mood, &[String]); 4] {
        [Mood::Energized, Mood::Tired, Mood::Positive, Mood::Negative]
            .map(|mood| (mood, self.patterns(mood)))
    }

    pub fn pattern_count(&self) -> usize {
        self.categories().iter().map(|(_, p)| p.len()).sum()
    }
}

fn normalize<I>(patterns: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref().trim().to_lowercase();
        if !pattern.is_empty() && !out.contains(&pattern) {
            out.push(pattern);
        }
    }
    out
}

// ============================================================================
// Built-in lexicon
// ============================================================================

const ENERGIZED: &[&str] = &[
    // mental alertness
    "ясн", "собран", "сконцентрирован", "сфокусирован", "внимательн", "включен", "волн",
    "соображаю", "поток", "четк", "структурн", "остр", "голов", "гибк", "мышлен", "мозг",
    "работает", "раз", "два", "решаю", "налету", "мысл", "полочк", "проснул", "порядок",
    "схватываю", "лету", "башк", "варит", "тормозит", "врубаюсь", "полуслов", "тупит",
    "фигачу", "шерлок",
    // physical energy
    "бодр", "легк", "свеж", "заряжен", "жив", "подвижн", "пружин", "энерг", "прет", "ход",
    "активн", "летиш", "теле", "огонь", "легкост", "крыл", "выросл", "могу", "заряд", "полн",
    "двигаться", "усидеть", "тело", "радуется", "пр", "огурчик", "бегаю", "заведен", "хрен",
    "догониш", "ног", "несут", "ебашу", "спортзал", "качаю", "охуенно", "пляшет",
    "бодрячком", "остановить", "заткнеш",
    // emotional uplift
    "ресурс", "вдохновлен", "стабильн", "радостн", "наполнен", "уверенн", "спокойн",
    "баланс", "душ", "цельн", "интерес", "делиться", "плечу", "хорошо", "нравится",
    "возможн", "вдохновляюсь", "процесс", "заебись", "кайфую", "жизн", "ебать", "добро",
    "улыбаеш", "балдежн", "состояние", "хуярю", "удовольстви", "идет", "надо", "аплодирую",
    "светится", "позитив",
    // phrases
    "энергичн", "бодра", "полон сил", "полна сил", "готов", "готова", "все могу",
    "все смогу", "отличное настроение", "прекрасное настроение", "полон энергии",
    "полна энергии", "много энергии", "активен", "активна", "бодрость", "энергия",
    "готов к работе", "готова к работе", "все по плечу", "все под силу",
    "отличное самочувствие", "прекрасное самочувствие", "полон энтузиазма",
    "полна энтузиазма",
];

const TIRED: &[&str] = &[
    // base states
    "устал", "вымотан", "выжат", "опустошен", "изможден", "разбит", "истощен", "перегруз",
    "перегор", "сонн", "мутн", "напряжен", "предел",
    // physical sensations
    "ватн", "голов", "тяжел", "шум", "плыв", "туп", "засыпа", "перегрев", "замедл", "туман",
    "тело", "диван", "леж", "стен", "поезд", "навалил", "тян", "одеял",
    // mental states
    "сообража", "вар", "мозг", "ресурс", "сил", "автопилот", "зомб", "провал", "существу",
    "ком", "тряпк", "говн", "лошад", "паш",
    // emotional states
    "выгоран", "нетерпим", "эмоциональн", "нахуй", "заеб", "задолб", "вымота", "еба",
    "пиздец", "сдох", "бляд", "охует", "говор",
    // negations and intensifiers
    "не", "нет", "никак", "больш", "последн", "вс", "просто", "как", "будто", "хоть", "уже",
    "всё", "все", "ничего", "никакой", "никакая",
    // actions
    "лечь", "лежать", "исчез", "выспат", "кончит", "встават", "полз", "встава",
    "провалива", "лез", "работа", "выжра", "высос", "заеба",
    // comparisons
    "словно", "точно", "похож", "напомина", "подобн", "такой", "такая", "такое", "такие",
    // phrases
    "устала", "утомлен", "утомлена", "нет сил", "нет энергии", "упадок сил", "хочу спать",
    "сонный", "сонная", "вымотана", "измотан", "измотана", "нет настроения", "усталость",
    "утомление", "хочу отдохнуть", "нужен отдых", "нужен сон", "изнурен", "изнурена",
    "истощена", "нет бодрости", "вялый", "вялая",
];

const POSITIVE: &[&str] = &[
    // base positive states
    "кайф", "охуенн", "заеб", "пиздат", "огонь", "ахуенн", "волшебн", "балдеж", "душевн",
    "чум", "кайфец", "кайфушк", "сладк", "красот", "тепл", "милот", "лампов", "трепетн",
    "пушечн", "праздник",
    // emotional reactions
    "раду", "мурашк", "приятн", "трогательн", "крут", "слез", "красив", "классн", "спокойн",
    "глубин", "прослез", "щем", "счаст", "любл", "обожа", "сердечк", "зашл", "тема",
    // intensifiers and comparisons
    "как", "будто", "словно", "точно", "прям", "уж", "вот", "ну", "аж", "через", "край",
    "слож", "надо",
    // base emotions
    "радостн", "легк", "уютн", "светл", "хорош", "мягк", "вдохновл", "умиротворен",
    "благодарн", "довольн", "восхищен", "нежн", "любов", "уверен", "забот", "интерес",
    "любопытн",
    // deep states
    "полнот", "смысл", "волнен", "принят", "наслажден", "восторг", "удовлетворен",
    "гармони", "ясн", "открыт", "довер", "поко", "надежд", "искрен", "целост", "благ",
    "благополуч", "признательн", "очарован",
    // physical sensations
    "свет", "обня", "сердц", "поет", "внутр", "место",
    // actions
    "улыба", "получил", "чувству", "дума", "тронул", "произошл", "доволен",
    // phrases
    "радостно", "весело", "прекрасно", "замечательно", "чудесно", "восхитительно",
    "потрясающе", "изумительно", "великолепно", "блестяще", "превосходно", "идеально",
    "совершенно", "прекрасный день", "замечательный день", "чудесный день", "в восторге",
    "в восхищении", "в эйфории", "на седьмом небе", "на вершине счастья", "полон радости",
    "полна радости", "счастливый", "счастливая", "довольна", "удовлетворена",
    "в хорошем настроении", "в отличном настроении", "в прекрасном настроении",
    "в чудесном настроении", "в восхитительном настроении", "в потрясающем настроении",
    "хорошо", "хорошая", "хороший", "хорошее",
];

const NEGATIVE: &[&str] = &[
    // base negative states
    "тосклив", "тревожн", "пуст", "обидн", "тяжел", "больн", "одинок", "горьк",
    "несправедлив", "страшн", "неловк", "стыдн", "злост", "безысходн", "уныл", "мучительн",
    "раздража", "разочарован", "нудн", "мерзк", "мерзост", "отвращен", "тревог", "скук",
    "апати", "ненавиж", "отчаян", "беспомощн",
    // colloquial
    "хуев", "паршив", "дерьмов", "говен", "бес", "жоп", "пизд", "еба", "надоел", "чертик",
    "ад", "бляд", "хренов", "хуйн", "сран", "сук", "хуяр", "херн", "черт", "херов", "нахуй",
    "надежд", "выт", "скреб", "сдох", "заеб",
    // emotional states
    "понима", "не так", "успоко", "плака", "застря", "дело", "лишн", "невыносим", "хоч",
    "испорт", "отпуст", "почему", "валит", "смысл", "дыр", "сер", "раду", "говор",
    // negations and intensifiers
    "не", "ни", "вс", "как", "будто", "словно", "точно", "опят", "внутр", "ничего", "никому",
    "ни с кем",
    // phrases
    "грустно", "печально", "тоскливо", "мрачно", "уныло", "депрессивно", "подавленно",
    "разбито", "разбита", "опустошен", "опустошена", "разочарована", "в отчаянии",
    "в унынии", "в депрессии", "в плохом настроении", "в ужасном настроении",
    "в отвратительном настроении", "в мерзком настроении", "в паршивом настроении",
    "в скверном настроении", "в дурном настроении", "в гадком настроении",
    "в мерзопакостном настроении", "в отвратном настроении", "в ужасном состоянии",
    "в плохом состоянии", "в отвратительном состоянии", "в мерзком состоянии",
    "в паршивом состоянии", "в скверном состоянии", "в дурном состоянии",
    "в гадком состоянии", "в мерзопакостном состоянии", "в отвратном состоянии",
];
