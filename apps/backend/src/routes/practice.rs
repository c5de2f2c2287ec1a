//! Exercise generation, translation check and tutor chat endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::{self, BatchRequest};
use crate::AppState;

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let batch = BatchRequest {
        counts: request.counts(),
        style: request.style(),
        specific_words: request.specific_words(),
    };

    let generated = services::generate_exercise_batch(
        state.store.as_ref(),
        state.model.as_ref(),
        &auth.user,
        batch,
    )
    .await?;

    let exercises = state.store.session_exercises(generated.session.id).await?;

    Ok(Json(GenerateResponse {
        sentences: generated.sentences,
        sentences_with_words: generated.sentences_with_words,
        words_used: generated.words_used,
        session: SessionResponse {
            id: generated.session.id,
            date: generated.session.date,
            last_words_used: generated.session.last_words_used,
            exercises,
        },
        used_ai: state.model.is_remote(),
    }))
}

/// POST /api/check
pub async fn check(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>> {
    let grade = services::check_translation(
        state.store.as_ref(),
        state.model.as_ref(),
        auth.user.id,
        &request,
    )
    .await?;

    Ok(Json(CheckResponse {
        is_correct: grade.is_correct,
        correct_translation: grade.correct_translation,
        explanation: grade.explanation,
        used_ai: state.model.is_remote(),
    }))
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let reply = services::chat(state.model.as_ref(), request.message.as_deref()).await?;

    Ok(Json(ChatResponse {
        reply,
        used_ai: state.model.is_remote(),
    }))
}
