// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Middleware that requires a valid token for an existing, active user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)?;

    let user_id = decode_jwt(&token, &state.config.jwt_signing_key)?;

    match state.db.get_user(user_id).await? {
        Some(user) if user.is_active => {}
        Some(_) => {
            tracing::warn!(user_id, "Token presented for inactive user");
            return Err(AppError::InvalidToken);
        }
        None => return Err(AppError::InvalidToken),
    }

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Validate a token and return the user id it was issued for.
pub fn decode_jwt(token: &str, signing_key: &[u8]) -> Result<i64, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::InvalidToken)
}

/// Create an access token for a user session.
pub fn create_jwt(user_id: i64, signing_key: &[u8], expire_minutes: i64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;
    let lifetime = usize::try_from(expire_minutes.max(0))? * 60;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + lifetime,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"unit_test_signing_key_0123456789";

    #[test]
    fn test_jwt_round_trip() {
        let token = create_jwt(42, KEY, 30).unwrap();
        assert_eq!(decode_jwt(&token, KEY).unwrap(), 42);
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let token = create_jwt(42, KEY, 30).unwrap();
        let err = decode_jwt(&token, b"some_other_key_entirely_00000000").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            sub: "42".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();

        assert!(decode_jwt(&token, KEY).is_err());
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            iat: 0,
            exp: usize::MAX / 2,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();

        assert!(decode_jwt(&token, KEY).is_err());
    }
}
