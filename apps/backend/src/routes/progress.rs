//! Progress and session endpoints

use axum::{extract::State, Extension, Json};
use chrono::Local;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services;
use crate::services::exercises::ensure_session;
use crate::AppState;

/// GET /api/progress
pub async fn progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ProgressResponse>> {
    let today = Local::now().date_naive();
    let report = services::compute_progress(state.store.as_ref(), auth.user.id, today).await?;
    Ok(Json(report))
}

async fn session_response(state: &AppState, session: PracticeSession) -> Result<SessionResponse> {
    let exercises = state.store.session_exercises(session.id).await?;
    Ok(SessionResponse {
        id: session.id,
        date: session.date,
        last_words_used: session.last_words_used,
        exercises,
    })
}

/// GET /api/sessions/current
/// Returns the active session, creating one when there is none
pub async fn current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SessionResponse>> {
    let session = ensure_session(state.store.as_ref(), auth.user.id).await?;
    Ok(Json(session_response(&state, session).await?))
}

/// POST /api/sessions
/// Starts a fresh session; later batches attach to it
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SessionResponse>> {
    let session = state.store.create_session(auth.user.id).await?;
    tracing::info!(user_id = %auth.user.id, session_id = session.id, "Started session");
    Ok(Json(session_response(&state, session).await?))
}
