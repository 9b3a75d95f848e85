//! Food catalog entries (per-100g macro values).

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A food in a user's personal library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    /// Owner of this entry
    pub user_id: i64,
}

/// Payload for adding a food to the library.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewFoodItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0, max = 10_000.0))]
    pub calories_per_100g: f64,
    #[validate(range(min = 0.0, max = 10_000.0))]
    pub protein_per_100g: f64,
    #[validate(range(min = 0.0, max = 10_000.0))]
    pub carbs_per_100g: f64,
    #[validate(range(min = 0.0, max = 10_000.0))]
    pub fat_per_100g: f64,
}
