//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use trainer_core::Identified;

pub use trainer_core::{Direction, ExerciseCounts, GenerationStyle};

/// Default native language of a new learner.
pub const DEFAULT_NATIVE_LANGUAGE: &str = "English";

/// Default target language of a new learner and of new words.
pub const DEFAULT_TARGET_LANGUAGE: &str = "Spanish";

// === Database Entity Types ===

/// Registered learner, identified by an opaque bearer token
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub token: String,
    pub name: Option<String>,
    pub native_language: String,
    pub target_language: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Vocabulary entry owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Word {
    pub id: i64,
    pub user_id: Uuid,
    pub text: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

impl Identified for Word {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Practice session grouping exercise batches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PracticeSession {
    pub id: i64,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    /// Word ids of recent batches, most recent last
    pub last_words_used: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// One sentence to translate, with the words it was generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: i64,
    pub user_id: Uuid,
    pub sentence: String,
    pub user_translation: String,
    pub correct_translation: String,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
    pub word_ids: Vec<i64>,
}

/// Exercise totals for a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct ExerciseStats {
    pub total: i64,
    /// Exercises with a non-empty submitted translation
    pub attempted: i64,
    pub correct: i64,
}

/// Batch of exercises to persist atomically
#[derive(Debug, Clone)]
pub struct NewExerciseBatch {
    pub user_id: Uuid,
    pub session_id: i64,
    pub sentences: Vec<String>,
    pub word_ids: Vec<i64>,
}

/// Outcome of grading a submitted translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub is_correct: bool,
    pub correct_translation: String,
    pub explanation: String,
}

// === API Request/Response Types ===

/// Register request
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub native_language: Option<String>,
    pub target_language: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

/// Profile update request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub native_language: Option<String>,
    pub target_language: Option<String>,
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub native_language: String,
    pub target_language: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            native_language: user.native_language,
            target_language: user.target_language,
        }
    }
}

/// Create or replace a vocabulary word
#[derive(Debug, Deserialize)]
pub struct WordRequest {
    pub text: Option<String>,
    pub language: Option<String>,
}

/// Generate exercises request
///
/// Counts are accepted as numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub level: Option<String>,
    pub length: Option<String>,
    pub topic: Option<String>,
    pub sentence_type: Option<String>,
    pub tense: Option<String>,
    pub grammar_focus: Option<String>,
    pub num_sentences: Option<Value>,
    pub words_count: Option<Value>,
    pub specific_words: Option<Vec<String>>,
}

impl GenerateRequest {
    pub fn style(&self) -> GenerationStyle {
        GenerationStyle::from_params(
            self.level.as_deref(),
            self.length.as_deref(),
            self.topic.as_deref(),
            self.sentence_type.as_deref(),
            self.tense.as_deref(),
            self.grammar_focus.as_deref(),
        )
    }

    pub fn counts(&self) -> ExerciseCounts {
        ExerciseCounts::clamped(
            lenient_count(self.num_sentences.as_ref()),
            lenient_count(self.words_count.as_ref()),
        )
    }

    /// Requested word texts, `None` when absent or empty
    pub fn specific_words(&self) -> Option<Vec<String>> {
        let words: Vec<String> = self
            .specific_words
            .iter()
            .flatten()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        (!words.is_empty()).then_some(words)
    }
}

/// Read an integer from a JSON number or numeric string; anything else is unset.
pub fn lenient_count(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A generated sentence and the vocabulary it contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceWords {
    pub sentence: String,
    pub words_found: Vec<String>,
}

/// Session as returned by the API, with its exercises
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub last_words_used: Vec<i64>,
    pub exercises: Vec<Exercise>,
}

/// Generate exercises response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub sentences: Vec<String>,
    pub sentences_with_words: Vec<SentenceWords>,
    pub words_used: Vec<String>,
    pub session: SessionResponse,
    pub used_ai: bool,
}

/// Check translation request
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    pub sentence: Option<String>,
    pub translation: Option<String>,
    pub direction: Option<String>,
}

/// Check translation response
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub is_correct: bool,
    pub correct_translation: String,
    pub explanation: String,
    pub used_ai: bool,
}

/// Progress response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressResponse {
    pub words_total: i64,
    pub exercises_total: i64,
    pub attempts_total: i64,
    pub correct_total: i64,
    pub accuracy: f64,
    pub sessions_total: i64,
    pub days_practiced: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_practice_date: Option<chrono::NaiveDate>,
}

/// Tutor chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// Tutor chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub used_ai: bool,
}
