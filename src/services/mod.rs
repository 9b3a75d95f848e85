// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Services module - business logic layer.

pub mod meal_log;
pub mod nutrition_ai;
pub mod password;

pub use meal_log::MealLogService;
pub use nutrition_ai::{
    GeminiClient, MacroAnalysisResponse, NutritionAnalyzer, TextGenerator,
};
