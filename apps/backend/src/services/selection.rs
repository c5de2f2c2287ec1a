//! Vocabulary selection backed by the store

use uuid::Uuid;

use trainer_core::{record_selection, select};

use crate::db::PracticeStore;
use crate::error::Result;
use crate::models::{PracticeSession, Word};

/// Pick up to `count` of the user's `language` words, avoiding the ones the
/// session used recently, and record the pick in the session history.
///
/// An empty vocabulary returns no words and leaves the session untouched.
pub async fn select_words(
    store: &dyn PracticeStore,
    user_id: Uuid,
    mut session: PracticeSession,
    count: usize,
    language: &str,
) -> Result<(Vec<Word>, PracticeSession)> {
    let pool = store.words_in_language(user_id, language).await?;
    if pool.is_empty() {
        return Ok((Vec::new(), session));
    }

    let selected = {
        let mut rng = rand::thread_rng();
        select(pool, count, &session.last_words_used, &mut rng)
    };

    let ids: Vec<i64> = selected.iter().map(|w| w.id).collect();
    session.last_words_used = record_selection(&session.last_words_used, &ids);
    store
        .set_session_history(session.id, &session.last_words_used)
        .await?;

    tracing::debug!(
        user_id = %user_id,
        session_id = session.id,
        selected = ids.len(),
        "Selected words"
    );

    Ok((selected, session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    async fn seeded(words: usize) -> (MemoryStore, Uuid, PracticeSession) {
        let store = MemoryStore::new();
        let user = store.create_user(None, "English", "Spanish").await.unwrap();
        for i in 0..words {
            store
                .create_word(user.id, &format!("palabra{i}"), "Spanish")
                .await
                .unwrap();
        }
        let session = store.create_session(user.id).await.unwrap();
        (store, user.id, session)
    }

    #[tokio::test]
    async fn empty_vocabulary_leaves_session_unchanged() {
        let (store, user_id, session) = seeded(0).await;
        let (words, updated) = select_words(&store, user_id, session.clone(), 5, "Spanish")
            .await
            .unwrap();
        assert!(words.is_empty());
        assert_eq!(updated, session);
    }

    #[tokio::test]
    async fn selection_is_recorded_in_history() {
        let (store, user_id, session) = seeded(8).await;
        let (words, updated) = select_words(&store, user_id, session, 3, "Spanish")
            .await
            .unwrap();
        assert_eq!(words.len(), 3);
        let ids: Vec<i64> = words.iter().map(|w| w.id).collect();
        assert_eq!(updated.last_words_used, ids);

        let stored = store.latest_session(user_id).await.unwrap().unwrap();
        assert_eq!(stored.last_words_used, ids);
    }

    #[tokio::test]
    async fn consecutive_selections_avoid_recent_words() {
        // 12 words, 5 per batch: the second batch never repeats the first
        let (store, user_id, session) = seeded(12).await;
        let (first, session) = select_words(&store, user_id, session, 5, "Spanish")
            .await
            .unwrap();
        let (second, _) = select_words(&store, user_id, session, 5, "Spanish")
            .await
            .unwrap();
        assert!(second.iter().all(|w| !first.contains(w)));
    }

    #[tokio::test]
    async fn only_matching_language_is_used() {
        let (store, user_id, session) = seeded(2).await;
        store.create_word(user_id, "dog", "English").await.unwrap();
        let (words, _) = select_words(&store, user_id, session, 20, "Spanish")
            .await
            .unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.language == "Spanish"));
    }
}
