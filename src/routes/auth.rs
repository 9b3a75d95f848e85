// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Account registration, login and the current-user endpoint.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::UserProfile;
use crate::services::password::{fits_bcrypt, hash_password, verify_password};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};

/// Registration and login (no auth required).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/", post(register))
        .route("/login/token", post(login))
}

/// Routes for the signed-in user.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users/me", get(get_me))
}

// ─── Registration ────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8), custom(function = password_fits_hash))]
    pub password: String,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
}

fn password_fits_hash(password: &str) -> std::result::Result<(), ValidationError> {
    if fits_bcrypt(password) {
        Ok(())
    } else {
        Err(ValidationError::new("password_too_long"))
    }
}

/// Account as returned to clients (never includes the password hash).
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub profile: Option<UserProfile>,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserResponse>> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let hashed = hash_password(&req.password).await?;
    let user = state
        .db
        .create_user(&email, req.full_name.as_deref(), &hashed)
        .await?;

    tracing::info!(user_id = user.id, "Registered new user");

    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        is_active: user.is_active,
        profile: None,
    }))
}

// ─── Login ───────────────────────────────────────────────────

/// OAuth2 password-flow form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    let email = form.username.trim().to_lowercase();

    let user = match state.db.get_user_by_email(&email).await? {
        Some(user) if user.is_active => user,
        _ => return Err(AppError::Unauthorized),
    };

    if !verify_password(&form.password, &user.hashed_password).await {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::Unauthorized);
    }

    let access_token = create_jwt(
        user.id,
        &state.config.jwt_signing_key,
        state.config.access_token_expire_minutes,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

// ─── Current User ────────────────────────────────────────────

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", auth.user_id)))?;
    let profile = state.db.get_profile(auth.user_id).await?;

    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        is_active: user.is_active,
        profile,
    }))
}
