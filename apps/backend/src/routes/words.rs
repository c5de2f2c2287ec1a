//! Vocabulary endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use trainer_core::{require_text, ValidationError};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

const MAX_TEXT: usize = 200;
const MAX_LANGUAGE: usize = 50;

/// Validated (text, language) of a word request
fn validate(request: &WordRequest) -> Result<(String, String)> {
    let text = require_text("text", request.text.as_deref())?;
    if text.chars().count() > MAX_TEXT {
        return Err(ValidationError::TooLong { field: "text", max: MAX_TEXT }.into());
    }

    let language = request
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_TARGET_LANGUAGE);
    if language.chars().count() > MAX_LANGUAGE {
        return Err(ValidationError::TooLong { field: "language", max: MAX_LANGUAGE }.into());
    }

    Ok((text.to_string(), language.to_string()))
}

fn duplicate() -> ApiError {
    ApiError::Conflict("This word already exists in your list".to_string())
}

/// GET /api/words
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Word>>> {
    let words = state.store.list_words(auth.user.id).await?;
    Ok(Json(words))
}

/// POST /api/words
/// Rejects a word that already exists ignoring case
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<WordRequest>,
) -> Result<(StatusCode, Json<Word>)> {
    let (text, language) = validate(&request)?;
    let user_id = auth.user.id;

    if state.store.word_exists(user_id, &text, &language, None).await? {
        return Err(duplicate());
    }

    let word = state.store.create_word(user_id, &text, &language).await?;
    tracing::info!(user_id = %user_id, word_id = word.id, "Added word");

    Ok((StatusCode::CREATED, Json(word)))
}

/// GET /api/words/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(word_id): Path<i64>,
) -> Result<Json<Word>> {
    state
        .store
        .get_word(auth.user.id, word_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("word {word_id}")))
}

/// PUT /api/words/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(word_id): Path<i64>,
    Json(request): Json<WordRequest>,
) -> Result<Json<Word>> {
    let (text, language) = validate(&request)?;
    let user_id = auth.user.id;

    if state
        .store
        .word_exists(user_id, &text, &language, Some(word_id))
        .await?
    {
        return Err(duplicate());
    }

    state
        .store
        .update_word(user_id, word_id, &text, &language)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("word {word_id}")))
}

/// DELETE /api/words/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(word_id): Path<i64>,
) -> Result<StatusCode> {
    if !state.store.delete_word(auth.user.id, word_id).await? {
        return Err(ApiError::NotFound(format!("word {word_id}")));
    }
    tracing::info!(user_id = %auth.user.id, word_id, "Deleted word");
    Ok(StatusCode::NO_CONTENT)
}
