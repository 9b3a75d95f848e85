// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Profile routes for the signed-in user.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ProfileFields, UserProfile};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile/", post(create_profile))
        .route("/profile/me", get(get_profile).put(update_profile))
}

fn profile_not_found() -> AppError {
    AppError::NotFound("Profile not found for this user".to_string())
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .db
        .get_profile(user.user_id)
        .await?
        .ok_or_else(profile_not_found)?;
    Ok(Json(profile))
}

async fn create_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(fields): Json<ProfileFields>,
) -> Result<Json<UserProfile>> {
    fields.validate()?;
    let profile = state.db.create_profile(user.user_id, fields).await?;
    tracing::info!(user_id = user.user_id, "Created profile");
    Ok(Json(profile))
}

/// Partial update: fields absent from the body keep their stored value.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(fields): Json<ProfileFields>,
) -> Result<Json<UserProfile>> {
    fields.validate()?;

    let mut profile = state
        .db
        .get_profile(user.user_id)
        .await?
        .ok_or_else(profile_not_found)?;
    profile.apply(fields);
    state.db.update_profile(&profile).await?;

    Ok(Json(profile))
}
