//! Generation parameters shared by the backend and its AI clients.
//!
//! Every enumerated parameter parses leniently: unknown input falls back to
//! the default (mixed/neutral) value instead of failing the request.

use serde::{Deserialize, Serialize};

/// CEFR proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Level {
    #[default]
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            "B2" => Some(Self::B2),
            "C1" => Some(Self::C1),
            "C2" => Some(Self::C2),
            _ => None,
        }
    }
}

/// Target sentence length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    #[default]
    Short,
    Medium,
    Long,
}

impl Length {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Accepts the English names and the Russian labels sent by older clients.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "short" | "короткая" => Some(Self::Short),
            "medium" | "средняя" => Some(Self::Medium),
            "long" | "длинная" => Some(Self::Long),
            _ => None,
        }
    }
}

/// Conversation topic for generated sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    #[default]
    Any,
    Sports,
    School,
    Travel,
    Food,
    Work,
    Family,
    City,
    Hobbies,
    Health,
    Technology,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Sports => "sports",
            Self::School => "school",
            Self::Travel => "travel",
            Self::Food => "food",
            Self::Work => "work",
            Self::Family => "family",
            Self::City => "city",
            Self::Hobbies => "hobbies",
            Self::Health => "health",
            Self::Technology => "technology",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "any" => Some(Self::Any),
            "sports" => Some(Self::Sports),
            "school" => Some(Self::School),
            "travel" => Some(Self::Travel),
            "food" => Some(Self::Food),
            "work" => Some(Self::Work),
            "family" => Some(Self::Family),
            "city" => Some(Self::City),
            "hobbies" => Some(Self::Hobbies),
            "health" => Some(Self::Health),
            "technology" => Some(Self::Technology),
            _ => None,
        }
    }
}

/// Grammatical mood of generated sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceType {
    #[default]
    Mixed,
    Affirmative,
    Interrogative,
    Negative,
}

impl SentenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Affirmative => "affirmative",
            Self::Interrogative => "interrogative",
            Self::Negative => "negative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mixed" => Some(Self::Mixed),
            "affirmative" => Some(Self::Affirmative),
            "interrogative" => Some(Self::Interrogative),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// Verb tense of generated sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    #[default]
    Mixed,
    Present,
    Past,
    Future,
}

impl Tense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Present => "present",
            Self::Past => "past",
            Self::Future => "future",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mixed" => Some(Self::Mixed),
            "present" => Some(Self::Present),
            "past" => Some(Self::Past),
            "future" => Some(Self::Future),
            _ => None,
        }
    }
}

/// Translation direction of a check request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "es-to-en")]
    SpanishToEnglish,
    #[serde(rename = "en-to-es")]
    EnglishToSpanish,
}

impl Direction {
    /// "en-to-es" selects English to Spanish; anything else is Spanish to English.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("en-to-es") => Self::EnglishToSpanish,
            _ => Self::SpanishToEnglish,
        }
    }

    /// (source, target) language names.
    pub fn languages(&self) -> (&'static str, &'static str) {
        match self {
            Self::SpanishToEnglish => ("Spanish", "English"),
            Self::EnglishToSpanish => ("English", "Spanish"),
        }
    }
}

/// Style constraints passed to the sentence generator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationStyle {
    pub level: Level,
    pub length: Length,
    pub topic: Topic,
    pub sentence_type: SentenceType,
    pub tense: Tense,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar_focus: Option<String>,
}

impl GenerationStyle {
    pub const MAX_GRAMMAR_FOCUS: usize = 120;

    /// Build a style from raw request values, defaulting anything unrecognized.
    ///
    /// The grammar focus is trimmed and cut to [`Self::MAX_GRAMMAR_FOCUS`]
    /// characters.
    pub fn from_params(
        level: Option<&str>,
        length: Option<&str>,
        topic: Option<&str>,
        sentence_type: Option<&str>,
        tense: Option<&str>,
        grammar_focus: Option<&str>,
    ) -> Self {
        let grammar_focus = grammar_focus
            .map(|focus| {
                focus
                    .trim()
                    .chars()
                    .take(Self::MAX_GRAMMAR_FOCUS)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .filter(|focus| !focus.is_empty());

        Self {
            level: level.and_then(Level::from_str).unwrap_or_default(),
            length: length.and_then(Length::from_str).unwrap_or_default(),
            topic: topic.and_then(Topic::from_str).unwrap_or_default(),
            sentence_type: sentence_type.and_then(SentenceType::from_str).unwrap_or_default(),
            tense: tense.and_then(Tense::from_str).unwrap_or_default(),
            grammar_focus,
        }
    }
}

/// Bounded exercise and word counts of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseCounts {
    pub sentences: usize,
    pub words: usize,
}

impl ExerciseCounts {
    pub const DEFAULT_SENTENCES: usize = 5;
    pub const DEFAULT_WORDS: usize = 5;
    pub const SENTENCE_RANGE: (usize, usize) = (5, 10);
    pub const WORD_RANGE: (usize, usize) = (1, 20);

    /// Clamp raw counts; missing values take the defaults.
    pub fn clamped(sentences: Option<i64>, words: Option<i64>) -> Self {
        let (min_s, max_s) = Self::SENTENCE_RANGE;
        let (min_w, max_w) = Self::WORD_RANGE;
        let sentences = sentences.unwrap_or(Self::DEFAULT_SENTENCES as i64);
        let words = words.unwrap_or(Self::DEFAULT_WORDS as i64);
        Self {
            sentences: sentences.clamp(min_s as i64, max_s as i64) as usize,
            words: words.clamp(min_w as i64, max_w as i64) as usize,
        }
    }
}

impl Default for ExerciseCounts {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}
