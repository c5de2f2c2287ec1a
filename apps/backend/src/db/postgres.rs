//! PostgreSQL database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::PracticeStore;
use crate::error::{ApiError, Result};
use crate::models::*;

const USER_COLUMNS: &str =
    "id, token, name, native_language, target_language, created_at, last_seen_at";

const WORD_COLUMNS: &str = "id, user_id, text, language, created_at";

const SESSION_COLUMNS: &str = "id, user_id, date, last_words_used, created_at";

/// Exercises joined with their word ids; callers append WHERE and GROUP BY.
const EXERCISE_SELECT: &str = r#"
    SELECT e.id, e.user_id, e.sentence, e.user_translation, e.correct_translation,
           e.is_correct, e.created_at,
           COALESCE(ARRAY_AGG(ew.word_id ORDER BY ew.word_id)
                    FILTER (WHERE ew.word_id IS NOT NULL), '{}') AS word_ids
    FROM exercises e
    LEFT JOIN exercise_words ew ON ew.exercise_id = e.id
"#;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique violation to a conflict, anything else to a database error.
fn unique_violation(error: sqlx::Error, message: &str) -> ApiError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Conflict(message.to_string())
        }
        _ => ApiError::Database(error),
    }
}

#[async_trait]
impl PracticeStore for Database {
    // === User Repository ===

    async fn create_user(
        &self,
        name: Option<&str>,
        native_language: &str,
        target_language: &str,
    ) -> Result<User> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (token, name, native_language, target_language)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&token)
        .bind(name)
        .bind(native_language)
        .bind(target_language)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_languages(
        &self,
        user_id: Uuid,
        native_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET native_language = COALESCE($2, native_language),
                target_language = COALESCE($3, target_language)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(native_language)
        .bind(target_language)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))
    }

    // === Word Repository ===

    async fn list_words(&self, user_id: Uuid) -> Result<Vec<Word>> {
        let words = sqlx::query_as::<_, Word>(&format!(
            "SELECT {WORD_COLUMNS} FROM words WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    async fn words_in_language(&self, user_id: Uuid, language: &str) -> Result<Vec<Word>> {
        let words = sqlx::query_as::<_, Word>(&format!(
            "SELECT {WORD_COLUMNS} FROM words WHERE user_id = $1 AND language = $2 ORDER BY id"
        ))
        .bind(user_id)
        .bind(language)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    async fn words_by_texts(
        &self,
        user_id: Uuid,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Word>> {
        let words = sqlx::query_as::<_, Word>(&format!(
            r#"
            SELECT {WORD_COLUMNS}
            FROM words
            WHERE user_id = $1 AND text = ANY($2) AND LOWER(language) = LOWER($3)
            ORDER BY id
            "#
        ))
        .bind(user_id)
        .bind(texts)
        .bind(language)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    async fn get_word(&self, user_id: Uuid, word_id: i64) -> Result<Option<Word>> {
        let word = sqlx::query_as::<_, Word>(&format!(
            "SELECT {WORD_COLUMNS} FROM words WHERE id = $1 AND user_id = $2"
        ))
        .bind(word_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(word)
    }

    async fn word_exists(
        &self,
        user_id: Uuid,
        text: &str,
        language: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM words
                WHERE user_id = $1
                  AND LOWER(text) = LOWER($2)
                  AND LOWER(language) = LOWER($3)
                  AND ($4::BIGINT IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(user_id)
        .bind(text)
        .bind(language)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_word(&self, user_id: Uuid, text: &str, language: &str) -> Result<Word> {
        sqlx::query_as::<_, Word>(&format!(
            r#"
            INSERT INTO words (user_id, text, language)
            VALUES ($1, $2, $3)
            RETURNING {WORD_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(text)
        .bind(language)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "This word already exists in your list"))
    }

    async fn update_word(
        &self,
        user_id: Uuid,
        word_id: i64,
        text: &str,
        language: &str,
    ) -> Result<Option<Word>> {
        sqlx::query_as::<_, Word>(&format!(
            r#"
            UPDATE words
            SET text = $3, language = $4
            WHERE id = $1 AND user_id = $2
            RETURNING {WORD_COLUMNS}
            "#
        ))
        .bind(word_id)
        .bind(user_id)
        .bind(text)
        .bind(language)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "This word already exists in your list"))
    }

    async fn delete_word(&self, user_id: Uuid, word_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM words WHERE id = $1 AND user_id = $2")
            .bind(word_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_words(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // === Session Repository ===

    async fn latest_session(&self, user_id: Uuid) -> Result<Option<PracticeSession>> {
        let session = sqlx::query_as::<_, PracticeSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM practice_sessions
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn create_session(&self, user_id: Uuid) -> Result<PracticeSession> {
        let session = sqlx::query_as::<_, PracticeSession>(&format!(
            r#"
            INSERT INTO practice_sessions (user_id)
            VALUES ($1)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    async fn set_session_history(&self, session_id: i64, word_ids: &[i64]) -> Result<()> {
        sqlx::query("UPDATE practice_sessions SET last_words_used = $2 WHERE id = $1")
            .bind(session_id)
            .bind(word_ids)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn session_dates(&self, user_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let dates: Vec<DateTime<Utc>> =
            sqlx::query_scalar("SELECT date FROM practice_sessions WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(dates)
    }

    async fn session_exercises(&self, session_id: i64) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            {EXERCISE_SELECT}
            WHERE e.id IN (SELECT exercise_id FROM session_exercises WHERE session_id = $1)
            GROUP BY e.id
            ORDER BY e.id
            "#
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    // === Exercise Repository ===

    async fn insert_exercise_batch(
        &self,
        batch: &NewExerciseBatch,
    ) -> Result<(PracticeSession, Vec<Exercise>)> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, PracticeSession>(&format!(
            r#"
            UPDATE practice_sessions SET date = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(batch.session_id)
        .bind(batch.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("session {}", batch.session_id)))?;

        let mut ids = Vec::with_capacity(batch.sentences.len());
        for sentence in &batch.sentences {
            let exercise_id: i64 = sqlx::query_scalar(
                "INSERT INTO exercises (user_id, sentence) VALUES ($1, $2) RETURNING id",
            )
            .bind(batch.user_id)
            .bind(sentence)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO exercise_words (exercise_id, word_id)
                SELECT $1, UNNEST($2::BIGINT[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(exercise_id)
            .bind(&batch.word_ids)
            .execute(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO session_exercises (session_id, exercise_id) VALUES ($1, $2)")
                .bind(batch.session_id)
                .bind(exercise_id)
                .execute(&mut *tx)
                .await?;

            ids.push(exercise_id);
        }

        tx.commit().await?;

        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            {EXERCISE_SELECT}
            WHERE e.id = ANY($1)
            GROUP BY e.id
            ORDER BY e.id
            "#
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok((session, exercises))
    }

    async fn record_attempt(
        &self,
        user_id: Uuid,
        sentence: &str,
        user_translation: &str,
        grade: &Grade,
    ) -> Result<Option<i64>> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE exercises
            SET user_translation = $3, correct_translation = $4, is_correct = $5
            WHERE id = (
                SELECT id FROM exercises
                WHERE user_id = $1 AND sentence = $2
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(sentence)
        .bind(user_translation)
        .bind(&grade.correct_translation)
        .bind(grade.is_correct)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn exercise_stats(&self, user_id: Uuid) -> Result<ExerciseStats> {
        let stats = sqlx::query_as::<_, ExerciseStats>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE user_translation <> '') AS attempted,
                   COUNT(*) FILTER (WHERE user_translation <> '' AND is_correct) AS correct
            FROM exercises
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
