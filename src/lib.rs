// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! LifeHub: personal health tracking backend.
//!
//! This crate provides the HTTP API for logging meals and workouts,
//! aggregating daily macros, and turning free-text meal descriptions into
//! structured entries with a generative-text service.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{MealLogService, NutritionAnalyzer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub meal_logs: MealLogService,
    pub analyzer: NutritionAnalyzer,
}
