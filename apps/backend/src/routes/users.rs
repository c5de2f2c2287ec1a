//! Registration and profile endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn language_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// POST /api/users/register
/// Creates a new learner and returns the token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<RegisterRequest>>,
) -> Result<Json<RegisterResponse>> {
    let payload = payload.unwrap_or_default();
    let user = state
        .store
        .create_user(
            payload.name.as_deref(),
            &language_or(payload.native_language.as_deref(), DEFAULT_NATIVE_LANGUAGE),
            &language_or(payload.target_language.as_deref(), DEFAULT_TARGET_LANGUAGE),
        )
        .await?;

    tracing::info!("Registered new user: {}", user.id);

    Ok(Json(RegisterResponse {
        user_id: user.id,
        token: user.token,
    }))
}

/// GET /api/me
pub async fn me(Extension(auth): Extension<AuthenticatedUser>) -> Json<ProfileResponse> {
    Json(auth.user.into())
}

/// PATCH /api/me
/// Blank values leave the language unchanged
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let clean = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let native = clean(request.native_language);
    let target = clean(request.target_language);

    let user = state
        .store
        .update_languages(auth.user.id, native.as_deref(), target.as_deref())
        .await?;

    tracing::info!(
        user_id = %user.id,
        native = %user.native_language,
        target = %user.target_language,
        "Updated languages"
    );

    Ok(Json(user.into()))
}
