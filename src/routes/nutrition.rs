// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Food catalog, meal log and meal analysis routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FoodItem, LoggedFoodItem, NewFoodItem, UserMealLog};
use crate::services::MacroAnalysisResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/nutrition/foods", post(create_food))
        .route("/nutrition/foods/search", get(search_foods))
        .route("/nutrition/meals/log", post(log_meal))
        .route("/nutrition/meals/by-date", get(get_meal_log))
        .route("/nutrition/meals/log-item/{log_item_id}", put(update_log_item))
        .route("/nutrition/meals/log-item", delete(delete_log_item))
        .route("/nutrition/analyze", post(analyze_meal))
}

// ─── Food Catalog ────────────────────────────────────────────

async fn create_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(food): Json<NewFoodItem>,
) -> Result<Json<FoodItem>> {
    food.validate()?;
    let created = state.db.create_food_item(user.user_id, &food).await?;
    Ok(Json(created))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
}

async fn search_foods(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<FoodItem>>> {
    let foods = state
        .db
        .search_food_items(user.user_id, params.query.trim())
        .await?;
    Ok(Json(foods))
}

// ─── Meal Log ────────────────────────────────────────────────

#[derive(Deserialize)]
struct OptionalDateQuery {
    log_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct DateQuery {
    log_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LogMealRequest {
    #[validate(nested)]
    pub items_to_log: Vec<LoggedFoodItem>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteLogItemRequest {
    pub date: NaiveDate,
    pub log_item_id: String,
}

/// Append entries to a day's log (today, UTC, unless `log_date` is given).
async fn log_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<OptionalDateQuery>,
    Json(req): Json<LogMealRequest>,
) -> Result<Json<UserMealLog>> {
    req.validate()?;
    let date = params.log_date.unwrap_or_else(|| Utc::now().date_naive());

    let log = state
        .meal_logs
        .append(user.user_id, date, req.items_to_log)
        .await?;
    Ok(Json(log))
}

async fn get_meal_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<DateQuery>,
) -> Result<Json<UserMealLog>> {
    let log = state.meal_logs.read(user.user_id, params.log_date).await?;
    Ok(Json(log))
}

async fn update_log_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(log_item_id): Path<String>,
    Query(params): Query<DateQuery>,
    Json(item): Json<LoggedFoodItem>,
) -> Result<Json<UserMealLog>> {
    item.validate()?;

    let log = state
        .meal_logs
        .update_item(user.user_id, params.log_date, &log_item_id, item)
        .await?;
    Ok(Json(log))
}

async fn delete_log_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<DeleteLogItemRequest>,
) -> Result<Json<UserMealLog>> {
    let log = state
        .meal_logs
        .delete_item(user.user_id, req.date, &req.log_item_id)
        .await?;
    Ok(Json(log))
}

// ─── Meal Analysis ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 2000))]
    pub query: String,
}

/// Estimate items and macros from a free-text meal description.
/// Nothing is stored; the client logs the result separately.
async fn analyze_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<MacroAnalysisResponse>> {
    req.validate()?;

    tracing::debug!(user_id = user.user_id, "Analyzing meal text");
    state
        .analyzer
        .analyze(&req.query)
        .await
        .map(Json)
        .ok_or(AppError::AnalysisFailed)
}
