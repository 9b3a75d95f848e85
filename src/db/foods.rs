//! Food catalog storage.

use super::{like_pattern, Database};
use crate::error::AppError;
use crate::models::{FoodItem, NewFoodItem};

impl Database {
    /// Add a food to a user's library.
    pub async fn create_food_item(
        &self,
        user_id: i64,
        food: &NewFoodItem,
    ) -> Result<FoodItem, AppError> {
        Ok(sqlx::query_as::<_, FoodItem>(
            r"
            INSERT INTO food_items
                (name, calories_per_100g, protein_per_100g, carbs_per_100g, fat_per_100g, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, calories_per_100g, protein_per_100g, carbs_per_100g, fat_per_100g, user_id
            ",
        )
        .bind(&food.name)
        .bind(food.calories_per_100g)
        .bind(food.protein_per_100g)
        .bind(food.carbs_per_100g)
        .bind(food.fat_per_100g)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?)
    }

    /// Case-insensitive substring search over a user's own foods.
    pub async fn search_food_items(
        &self,
        user_id: i64,
        query: &str,
    ) -> Result<Vec<FoodItem>, AppError> {
        Ok(sqlx::query_as::<_, FoodItem>(
            r"
            SELECT id, name, calories_per_100g, protein_per_100g, carbs_per_100g, fat_per_100g, user_id
            FROM food_items
            WHERE user_id = ? AND name LIKE ? ESCAPE '\'
            ORDER BY name COLLATE NOCASE, id
            ",
        )
        .bind(user_id)
        .bind(like_pattern(query))
        .fetch_all(self.pool())
        .await?)
    }
}
