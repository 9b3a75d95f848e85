// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use lifehub::config::Config;
use lifehub::db::Database;
use lifehub::error::AppError;
use lifehub::routes::create_router;
use lifehub::services::{MealLogService, NutritionAnalyzer, TextGenerator};
use lifehub::AppState;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

/// Text generator that replays canned replies in order, then fails.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    #[allow(dead_code)]
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::AiService("no scripted reply left".to_string()))
    }
}

/// Create a test app over a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_generator(Arc::new(ScriptedGenerator::default())).await
}

#[allow(dead_code)]
pub async fn create_test_app_with_generator(
    generator: Arc<dyn TextGenerator>,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Database::connect(&config.database_url)
        .await
        .expect("in-memory database");
    db.seed_exercises().await.expect("seed exercises");

    let analyzer = NutritionAnalyzer::new(generator, config.ai_timeout);
    let state = Arc::new(AppState {
        config,
        meal_logs: MealLogService::new(db.clone()),
        db,
        analyzer,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT token.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: i64, signing_key: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Insert a user directly (skipping bcrypt) and return its id and a token.
#[allow(dead_code)]
pub async fn signed_in_user(state: &AppState, email: &str) -> (i64, String) {
    let user = state
        .db
        .create_user(email, None, "not-a-real-hash")
        .await
        .expect("create user");
    let token = create_test_jwt(user.id, &state.config.jwt_signing_key);
    (user.id, token)
}

/// Build an authenticated request with an optional JSON body.
#[allow(dead_code)]
pub fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and return the status and the JSON body (`Null` if empty).
#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
