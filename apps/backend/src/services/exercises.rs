//! Exercise generation and translation checking

use uuid::Uuid;

use trainer_core::{
    equivalent, match_words, require_text, Direction, ExerciseCounts, GenerationStyle,
    ValidationError,
};

use super::selection::select_words;
use crate::ai::{AiError, GenerationRequest, LanguageModel};
use crate::db::PracticeStore;
use crate::error::{ApiError, Result};
use crate::models::*;

/// Words used when a Spanish learner has no vocabulary yet.
pub const DEFAULT_BASE_WORDS: [&str; 10] = [
    "hola", "casa", "comida", "libro", "trabajo", "familia", "amigo", "ciudad", "tiempo", "viaje",
];

/// Parameters of one generation request
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub counts: ExerciseCounts,
    pub style: GenerationStyle,
    /// Explicit word texts overriding random selection
    pub specific_words: Option<Vec<String>>,
}

/// Result of [`generate_exercise_batch`]
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    pub sentences: Vec<String>,
    pub sentences_with_words: Vec<SentenceWords>,
    pub words_used: Vec<String>,
    pub session: PracticeSession,
    pub exercises: Vec<Exercise>,
}

/// The user's most recently active session, created when there is none.
pub async fn ensure_session(store: &dyn PracticeStore, user_id: Uuid) -> Result<PracticeSession> {
    match store.latest_session(user_id).await? {
        Some(session) => Ok(session),
        None => store.create_session(user_id).await,
    }
}

/// The built-in list cycled to `count` entries, or nothing for other languages.
pub fn default_words(target_language: &str, count: usize) -> Vec<String> {
    if !target_language.eq_ignore_ascii_case("spanish") {
        return Vec::new();
    }
    DEFAULT_BASE_WORDS
        .iter()
        .cycle()
        .take(count)
        .map(|w| w.to_string())
        .collect()
}

fn log_model_failure(operation: &str, model: &dyn LanguageModel, error: &AiError) {
    if error.is_transient() {
        tracing::warn!(model = model.name(), error = %error, "{} hit model quota", operation);
    } else {
        tracing::error!(model = model.name(), error = %error, "{} failed", operation);
    }
}

/// Generate and persist one batch of exercises for `user`.
///
/// Nothing is persisted when the model fails.
pub async fn generate_exercise_batch(
    store: &dyn PracticeStore,
    model: &dyn LanguageModel,
    user: &User,
    request: BatchRequest,
) -> Result<GeneratedBatch> {
    let language = user.target_language.as_str();
    let session = ensure_session(store, user.id).await?;

    let (words, session) = match &request.specific_words {
        Some(texts) => (store.words_by_texts(user.id, texts, language).await?, session),
        None => select_words(store, user.id, session, request.counts.words, language).await?,
    };

    let word_texts: Vec<String> = if words.is_empty() {
        default_words(language, request.counts.words)
    } else {
        words.iter().map(|w| w.text.clone()).collect()
    };

    let generation = GenerationRequest {
        words: word_texts.clone(),
        count: request.counts.sentences,
        style: request.style,
        language: language.to_string(),
        native_language: user.native_language.clone(),
    };

    let sentences = model.generate(&generation).await.map_err(|e| {
        log_model_failure("Sentence generation", model, &e);
        ApiError::from(e)
    })?;

    let sentences_with_words: Vec<SentenceWords> = sentences
        .iter()
        .map(|sentence| SentenceWords {
            sentence: sentence.clone(),
            words_found: match_words(sentence, &word_texts)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    let (session, exercises) = store
        .insert_exercise_batch(&NewExerciseBatch {
            user_id: user.id,
            session_id: session.id,
            sentences: sentences.clone(),
            word_ids: words.iter().map(|w| w.id).collect(),
        })
        .await?;

    tracing::info!(
        user_id = %user.id,
        session_id = session.id,
        exercises = exercises.len(),
        words = word_texts.len(),
        "Generated exercise batch"
    );

    Ok(GeneratedBatch {
        sentences,
        sentences_with_words,
        words_used: word_texts,
        session,
        exercises,
    })
}

/// Grade a translation and record it on the latest matching exercise.
///
/// A missing sentence or translation is rejected; an empty translation asks
/// the model for the reference translation.
pub async fn check_translation(
    store: &dyn PracticeStore,
    model: &dyn LanguageModel,
    user_id: Uuid,
    request: &CheckRequest,
) -> Result<Grade> {
    let sentence = require_text("sentence", request.sentence.as_deref())?;
    let translation = request
        .translation
        .as_deref()
        .ok_or(ValidationError::MissingField { field: "translation" })?;
    let direction = Direction::from_tag(request.direction.as_deref());

    let grade = if equivalent(sentence, translation) {
        Grade {
            is_correct: true,
            correct_translation: translation.to_string(),
            explanation: String::new(),
        }
    } else {
        model
            .grade(sentence, translation, direction)
            .await
            .map_err(|e| {
                log_model_failure("Translation check", model, &e);
                ApiError::from(e)
            })?
    };

    let recorded = store
        .record_attempt(user_id, sentence, translation, &grade)
        .await?;

    tracing::debug!(
        user_id = %user_id,
        exercise_id = ?recorded,
        is_correct = grade.is_correct,
        "Checked translation"
    );

    Ok(grade)
}

/// Ask the tutor model a question.
pub async fn chat(model: &dyn LanguageModel, message: Option<&str>) -> Result<String> {
    let message = require_text("message", message)?;
    model.chat(message).await.map_err(|e| {
        log_model_failure("Tutor chat", model, &e);
        ApiError::from(e)
    })
}
