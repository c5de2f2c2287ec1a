//! In-process store used when no database is configured, and by the tests

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::PracticeStore;
use crate::error::{ApiError, Result};
use crate::models::*;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    words: Vec<Word>,
    sessions: Vec<PracticeSession>,
    exercises: Vec<Exercise>,
    /// (session_id, exercise_id)
    session_links: Vec<(i64, i64)>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store keeping everything behind a single mutex.
///
/// Each operation takes the lock once, so multi-row writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| ApiError::Internal("memory store lock poisoned".to_string()))
    }

    /// Move a session to another point in time.
    pub fn set_session_date(&self, session_id: i64, date: DateTime<Utc>) -> Result<()> {
        let mut tables = self.lock()?;
        let session = tables
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| ApiError::NotFound(format!("session {session_id}")))?;
        session.date = date;
        Ok(())
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl PracticeStore for MemoryStore {
    async fn create_user(
        &self,
        name: Option<&str>,
        native_language: &str,
        target_language: &str,
    ) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            token: Uuid::new_v4().to_string(),
            name: name.map(str::to_string),
            native_language: native_language.to_string(),
            target_language: target_language.to_string(),
            created_at: now,
            last_seen_at: now,
        };
        self.lock()?.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.token == token).cloned())
    }

    async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.last_seen_at = Utc::now();
        }
        Ok(())
    }

    async fn update_languages(
        &self,
        user_id: Uuid,
        native_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<User> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))?;
        if let Some(native) = native_language {
            user.native_language = native.to_string();
        }
        if let Some(target) = target_language {
            user.target_language = target.to_string();
        }
        Ok(user.clone())
    }

    async fn list_words(&self, user_id: Uuid) -> Result<Vec<Word>> {
        let tables = self.lock()?;
        let mut words: Vec<Word> = tables
            .words
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        words.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(words)
    }

    async fn words_in_language(&self, user_id: Uuid, language: &str) -> Result<Vec<Word>> {
        let tables = self.lock()?;
        Ok(tables
            .words
            .iter()
            .filter(|w| w.user_id == user_id && w.language == language)
            .cloned()
            .collect())
    }

    async fn words_by_texts(
        &self,
        user_id: Uuid,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Word>> {
        let tables = self.lock()?;
        Ok(tables
            .words
            .iter()
            .filter(|w| {
                w.user_id == user_id && same_text(&w.language, language) && texts.contains(&w.text)
            })
            .cloned()
            .collect())
    }

    async fn get_word(&self, user_id: Uuid, word_id: i64) -> Result<Option<Word>> {
        let tables = self.lock()?;
        Ok(tables
            .words
            .iter()
            .find(|w| w.id == word_id && w.user_id == user_id)
            .cloned())
    }

    async fn word_exists(
        &self,
        user_id: Uuid,
        text: &str,
        language: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let tables = self.lock()?;
        Ok(tables.words.iter().any(|w| {
            w.user_id == user_id
                && Some(w.id) != exclude_id
                && same_text(&w.text, text)
                && same_text(&w.language, language)
        }))
    }

    async fn create_word(&self, user_id: Uuid, text: &str, language: &str) -> Result<Word> {
        let mut tables = self.lock()?;
        if tables
            .words
            .iter()
            .any(|w| w.user_id == user_id && w.text == text && w.language == language)
        {
            return Err(ApiError::Conflict(
                "This word already exists in your list".to_string(),
            ));
        }
        let word = Word {
            id: tables.next_id(),
            user_id,
            text: text.to_string(),
            language: language.to_string(),
            created_at: Utc::now(),
        };
        tables.words.push(word.clone());
        Ok(word)
    }

    async fn update_word(
        &self,
        user_id: Uuid,
        word_id: i64,
        text: &str,
        language: &str,
    ) -> Result<Option<Word>> {
        let mut tables = self.lock()?;
        if tables.words.iter().any(|w| {
            w.user_id == user_id && w.id != word_id && w.text == text && w.language == language
        }) {
            return Err(ApiError::Conflict(
                "This word already exists in your list".to_string(),
            ));
        }
        let Some(word) = tables
            .words
            .iter_mut()
            .find(|w| w.id == word_id && w.user_id == user_id)
        else {
            return Ok(None);
        };
        word.text = text.to_string();
        word.language = language.to_string();
        Ok(Some(word.clone()))
    }

    async fn delete_word(&self, user_id: Uuid, word_id: i64) -> Result<bool> {
        let mut tables = self.lock()?;
        let before = tables.words.len();
        tables
            .words
            .retain(|w| !(w.id == word_id && w.user_id == user_id));
        let removed = tables.words.len() < before;
        if removed {
            for exercise in &mut tables.exercises {
                exercise.word_ids.retain(|id| *id != word_id);
            }
        }
        Ok(removed)
    }

    async fn count_words(&self, user_id: Uuid) -> Result<i64> {
        let tables = self.lock()?;
        Ok(tables.words.iter().filter(|w| w.user_id == user_id).count() as i64)
    }

    async fn latest_session(&self, user_id: Uuid) -> Result<Option<PracticeSession>> {
        let tables = self.lock()?;
        Ok(tables
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| (s.date, s.id))
            .cloned())
    }

    async fn create_session(&self, user_id: Uuid) -> Result<PracticeSession> {
        let mut tables = self.lock()?;
        let now = Utc::now();
        let session = PracticeSession {
            id: tables.next_id(),
            user_id,
            date: now,
            last_words_used: Vec::new(),
            created_at: now,
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn set_session_history(&self, session_id: i64, word_ids: &[i64]) -> Result<()> {
        let mut tables = self.lock()?;
        if let Some(session) = tables.sessions.iter_mut().find(|s| s.id == session_id) {
            session.last_words_used = word_ids.to_vec();
        }
        Ok(())
    }

    async fn session_dates(&self, user_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let tables = self.lock()?;
        Ok(tables
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.date)
            .collect())
    }

    async fn session_exercises(&self, session_id: i64) -> Result<Vec<Exercise>> {
        let tables = self.lock()?;
        Ok(tables
            .exercises
            .iter()
            .filter(|e| tables.session_links.contains(&(session_id, e.id)))
            .cloned()
            .collect())
    }

    async fn insert_exercise_batch(
        &self,
        batch: &NewExerciseBatch,
    ) -> Result<(PracticeSession, Vec<Exercise>)> {
        let mut tables = self.lock()?;

        let session_index = tables
            .sessions
            .iter()
            .position(|s| s.id == batch.session_id && s.user_id == batch.user_id)
            .ok_or_else(|| ApiError::NotFound(format!("session {}", batch.session_id)))?;

        let mut word_ids = batch.word_ids.clone();
        word_ids.sort_unstable();
        word_ids.dedup();
        word_ids.retain(|id| tables.words.iter().any(|w| w.id == *id));

        let now = Utc::now();
        let mut inserted = Vec::with_capacity(batch.sentences.len());
        for sentence in &batch.sentences {
            let exercise = Exercise {
                id: tables.next_id(),
                user_id: batch.user_id,
                sentence: sentence.clone(),
                user_translation: String::new(),
                correct_translation: String::new(),
                is_correct: false,
                created_at: now,
                word_ids: word_ids.clone(),
            };
            tables.session_links.push((batch.session_id, exercise.id));
            tables.exercises.push(exercise.clone());
            inserted.push(exercise);
        }
        let session = &mut tables.sessions[session_index];
        session.date = now;

        Ok((session.clone(), inserted))
    }

    async fn record_attempt(
        &self,
        user_id: Uuid,
        sentence: &str,
        user_translation: &str,
        grade: &Grade,
    ) -> Result<Option<i64>> {
        let mut tables = self.lock()?;
        let latest = tables
            .exercises
            .iter_mut()
            .filter(|e| e.user_id == user_id && e.sentence == sentence)
            .max_by_key(|e| (e.created_at, e.id));

        Ok(latest.map(|exercise| {
            exercise.user_translation = user_translation.to_string();
            exercise.correct_translation = grade.correct_translation.clone();
            exercise.is_correct = grade.is_correct;
            exercise.id
        }))
    }

    async fn exercise_stats(&self, user_id: Uuid) -> Result<ExerciseStats> {
        let tables = self.lock()?;
        let mut stats = ExerciseStats::default();
        for exercise in tables.exercises.iter().filter(|e| e.user_id == user_id) {
            stats.total += 1;
            if !exercise.user_translation.is_empty() {
                stats.attempted += 1;
                if exercise.is_correct {
                    stats.correct += 1;
                }
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    async fn store_with_user() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store.create_user(None, "English", "Spanish").await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn words_are_scoped_to_their_owner() {
        let (store, alice) = store_with_user().await;
        let bob = store.create_user(None, "English", "Spanish").await.unwrap();
        let word = assert_ok!(store.create_word(alice.id, "perro", "Spanish").await);

        assert!(store.get_word(bob.id, word.id).await.unwrap().is_none());
        assert!(!store.delete_word(bob.id, word.id).await.unwrap());
        assert_eq!(store.count_words(alice.id).await.unwrap(), 1);
        assert_eq!(store.count_words(bob.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn exact_duplicate_word_conflicts() {
        let (store, user) = store_with_user().await;
        store.create_word(user.id, "perro", "Spanish").await.unwrap();
        let error = assert_err!(store.create_word(user.id, "perro", "Spanish").await);
        assert!(matches!(error, ApiError::Conflict(_)));
        assert!(store.word_exists(user.id, "PERRO", "spanish", None).await.unwrap());
    }

    #[tokio::test]
    async fn batch_for_unknown_session_inserts_nothing() {
        let (store, user) = store_with_user().await;
        let batch = NewExerciseBatch {
            user_id: user.id,
            session_id: 999,
            sentences: vec!["Hola.".to_string()],
            word_ids: vec![],
        };
        let result = store.insert_exercise_batch(&batch).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(store.exercise_stats(user.id).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn attempt_updates_latest_matching_exercise() {
        let (store, user) = store_with_user().await;
        let session = store.create_session(user.id).await.unwrap();
        let batch = NewExerciseBatch {
            user_id: user.id,
            session_id: session.id,
            sentences: vec!["Hola.".to_string(), "Hola.".to_string()],
            word_ids: vec![],
        };
        let (touched, inserted) = store.insert_exercise_batch(&batch).await.unwrap();
        assert_eq!(touched.id, session.id);
        assert!(touched.date >= session.date);
        let grade = Grade {
            is_correct: true,
            correct_translation: "Hello.".to_string(),
            explanation: String::new(),
        };

        let updated = store.record_attempt(user.id, "Hola.", "Hello", &grade).await.unwrap();
        assert_eq!(updated, Some(inserted[1].id));

        let missing = store.record_attempt(user.id, "Adiós.", "Bye", &grade).await.unwrap();
        assert_eq!(missing, None);

        let stats = store.exercise_stats(user.id).await.unwrap();
        assert_eq!(stats, ExerciseStats { total: 2, attempted: 1, correct: 1 });
    }
}
