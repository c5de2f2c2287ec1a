//! Persistence for learners, vocabulary, sessions and exercises

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::Database;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Storage used by the request handlers.
///
/// Every method is scoped to a user; rows owned by another user behave as
/// if they did not exist.
#[async_trait]
pub trait PracticeStore: Send + Sync {
    // === Users ===

    async fn create_user(
        &self,
        name: Option<&str>,
        native_language: &str,
        target_language: &str,
    ) -> Result<User>;

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>>;

    async fn update_last_seen(&self, user_id: Uuid) -> Result<()>;

    /// Change either language; `None` leaves it as is.
    async fn update_languages(
        &self,
        user_id: Uuid,
        native_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<User>;

    // === Words ===

    /// All words of a user, newest first
    async fn list_words(&self, user_id: Uuid) -> Result<Vec<Word>>;

    /// Words whose language equals `language` exactly
    async fn words_in_language(&self, user_id: Uuid, language: &str) -> Result<Vec<Word>>;

    /// Words with one of `texts`, language compared case-insensitively
    async fn words_by_texts(
        &self,
        user_id: Uuid,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Word>>;

    async fn get_word(&self, user_id: Uuid, word_id: i64) -> Result<Option<Word>>;

    /// Whether another word has the same text and language, ignoring case
    async fn word_exists(
        &self,
        user_id: Uuid,
        text: &str,
        language: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool>;

    async fn create_word(&self, user_id: Uuid, text: &str, language: &str) -> Result<Word>;

    async fn update_word(
        &self,
        user_id: Uuid,
        word_id: i64,
        text: &str,
        language: &str,
    ) -> Result<Option<Word>>;

    /// Returns false when the word did not exist
    async fn delete_word(&self, user_id: Uuid, word_id: i64) -> Result<bool>;

    async fn count_words(&self, user_id: Uuid) -> Result<i64>;

    // === Sessions ===

    /// Most recently active session
    async fn latest_session(&self, user_id: Uuid) -> Result<Option<PracticeSession>>;

    async fn create_session(&self, user_id: Uuid) -> Result<PracticeSession>;

    async fn set_session_history(&self, session_id: i64, word_ids: &[i64]) -> Result<()>;

    async fn session_dates(&self, user_id: Uuid) -> Result<Vec<DateTime<Utc>>>;

    async fn session_exercises(&self, session_id: i64) -> Result<Vec<Exercise>>;

    // === Exercises ===

    /// Insert the batch, link each exercise to its words and session, and
    /// touch the session date, all or nothing.
    ///
    /// Returns the touched session along with the new exercises.
    async fn insert_exercise_batch(
        &self,
        batch: &NewExerciseBatch,
    ) -> Result<(PracticeSession, Vec<Exercise>)>;

    /// Store the grading of the most recent exercise with this sentence.
    ///
    /// Returns the updated exercise id, `None` when no exercise matched.
    async fn record_attempt(
        &self,
        user_id: Uuid,
        sentence: &str,
        user_translation: &str,
        grade: &Grade,
    ) -> Result<Option<i64>>;

    async fn exercise_stats(&self, user_id: Uuid) -> Result<ExerciseStats>;
}
