// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Exercise catalog, workout plan and workout log routes.
//!
//! Plans and logs are only ever visible to their owner; a foreign id is
//! reported exactly like a missing one.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Exercise, NewWorkoutLog, NewWorkoutPlan, WorkoutLog, WorkoutPlan};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Hard cap on one page of the exercise catalog.
const MAX_EXERCISE_PAGE: i64 = 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/workouts/exercises", get(list_exercises))
        .route("/workouts/exercises/search", get(search_exercises))
        .route("/workouts/plans", get(list_plans).post(create_plan))
        .route("/workouts/plans/{plan_id}", get(get_plan).delete(delete_plan))
        .route("/workouts/logs", get(list_logs).post(create_log))
        .route("/workouts/logs/{log_id}", get(get_log).delete(delete_log))
}

// ─── Exercises ───────────────────────────────────────────────

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Deserialize, Validate)]
struct ExerciseSearchQuery {
    #[validate(length(min = 1))]
    query: String,
}

async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Exercise>>> {
    if page.skip < 0 || page.limit < 0 {
        return Err(AppError::BadRequest(
            "skip and limit must not be negative".to_string(),
        ));
    }
    let limit = page.limit.min(MAX_EXERCISE_PAGE);
    Ok(Json(state.db.list_exercises(page.skip, limit).await?))
}

async fn search_exercises(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExerciseSearchQuery>,
) -> Result<Json<Vec<Exercise>>> {
    params.validate()?;
    Ok(Json(state.db.search_exercises(&params.query).await?))
}

// ─── Plans ───────────────────────────────────────────────────

fn plan_not_found() -> AppError {
    AppError::NotFound("Plan not found".to_string())
}

async fn create_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(plan): Json<NewWorkoutPlan>,
) -> Result<Json<WorkoutPlan>> {
    plan.validate()?;
    let created = state.db.create_workout_plan(user.user_id, &plan).await?;
    tracing::info!(user_id = user.user_id, plan_id = created.id, "Created workout plan");
    Ok(Json(created))
}

async fn list_plans(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WorkoutPlan>>> {
    Ok(Json(state.db.list_workout_plans(user.user_id).await?))
}

async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(plan_id): Path<i64>,
) -> Result<Json<WorkoutPlan>> {
    state
        .db
        .get_workout_plan(plan_id, user.user_id)
        .await?
        .map(Json)
        .ok_or_else(plan_not_found)
}

async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(plan_id): Path<i64>,
) -> Result<StatusCode> {
    if !state.db.delete_workout_plan(plan_id, user.user_id).await? {
        return Err(plan_not_found());
    }
    tracing::info!(user_id = user.user_id, plan_id, "Deleted workout plan");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Logs ────────────────────────────────────────────────────

fn log_not_found() -> AppError {
    AppError::NotFound("Workout log not found".to_string())
}

#[derive(Deserialize)]
struct DateRangeQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

async fn create_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(log): Json<NewWorkoutLog>,
) -> Result<Json<WorkoutLog>> {
    log.validate()?;
    let created = state.db.create_workout_log(user.user_id, &log).await?;
    tracing::info!(user_id = user.user_id, log_id = created.id, date = %created.date, "Logged workout");
    Ok(Json(created))
}

/// Logs dated within `[start_date, end_date]`, oldest first.
async fn list_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<WorkoutLog>>> {
    if range.start_date > range.end_date {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }
    let logs = state
        .db
        .list_workout_logs(user.user_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(logs))
}

async fn get_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(log_id): Path<i64>,
) -> Result<Json<WorkoutLog>> {
    state
        .db
        .get_workout_log(log_id, user.user_id)
        .await?
        .map(Json)
        .ok_or_else(log_not_found)
}

async fn delete_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(log_id): Path<i64>,
) -> Result<StatusCode> {
    if !state.db.delete_workout_log(log_id, user.user_id).await? {
        return Err(log_not_found());
    }
    tracing::info!(user_id = user.user_id, log_id, "Deleted workout log");
    Ok(StatusCode::NO_CONTENT)
}
