// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Meal log document storage.
//!
//! One row per (user, date). The entry list and the totals aggregate are
//! stored as JSON text and rehydrated on every read.

use super::Database;
use crate::error::AppError;
use crate::models::{MacroTotals, MealLogContents, UserMealLog};
use chrono::NaiveDate;

#[derive(sqlx::FromRow)]
struct MealLogRow {
    id: i64,
    user_id: i64,
    date: NaiveDate,
    food_items_json: String,
    total_macros_json: String,
}

impl TryFrom<MealLogRow> for UserMealLog {
    type Error = AppError;

    fn try_from(row: MealLogRow) -> Result<Self, Self::Error> {
        let food_items: MealLogContents = serde_json::from_str(&row.food_items_json)?;
        let total_macros: MacroTotals = serde_json::from_str(&row.total_macros_json)?;
        Ok(UserMealLog {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            food_items,
            total_macros,
        })
    }
}

impl Database {
    /// Get the meal log for a user and date.
    pub async fn get_meal_log(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<UserMealLog>, AppError> {
        sqlx::query_as::<_, MealLogRow>(
            r"
            SELECT id, user_id, date, food_items_json, total_macros_json
            FROM user_meal_logs
            WHERE user_id = ? AND date = ?
            ",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(self.pool())
        .await?
        .map(UserMealLog::try_from)
        .transpose()
    }

    /// Write a full meal log document, keyed by (user, date).
    ///
    /// Creates the row if the date has none yet, otherwise overwrites both
    /// blobs. Returns the stored row id. Documents whose totals are not
    /// finite are refused so a stored row always parses back.
    pub async fn save_meal_log(&self, log: &UserMealLog) -> Result<i64, AppError> {
        if !log.total_macros.is_finite() {
            return Err(AppError::BadRequest(
                "Meal log totals are out of range".to_string(),
            ));
        }

        let food_items_json = serde_json::to_string(&log.food_items)?;
        let total_macros_json = serde_json::to_string(&log.total_macros)?;

        let (id,): (i64,) = sqlx::query_as(
            r"
            INSERT INTO user_meal_logs (user_id, date, food_items_json, total_macros_json)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET
                food_items_json = excluded.food_items_json,
                total_macros_json = excluded.total_macros_json
            RETURNING id
            ",
        )
        .bind(log.user_id)
        .bind(log.date)
        .bind(&food_items_json)
        .bind(&total_macros_json)
        .fetch_one(self.pool())
        .await?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoggedFoodItem;

    fn item(name: &str, calories: f64) -> LoggedFoodItem {
        LoggedFoodItem {
            log_item_id: String::new(),
            name: name.to_string(),
            quantity_g: 50.0,
            calories,
            protein: 1.5,
            carbs: 2.25,
            fat: 0.1,
        }
    }

    #[tokio::test]
    async fn test_document_round_trips_exactly() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let user = db.create_user("m@example.com", None, "h").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let mut log = UserMealLog::placeholder(user.id, date);
        log.append_items(vec![item("Almonds", 290.0), item("Pear", 57.3)]);
        log.id = db.save_meal_log(&log).await.unwrap();

        let stored = db.get_meal_log(user.id, date).await.unwrap().unwrap();
        assert_eq!(stored, log);
    }

    #[tokio::test]
    async fn test_save_keeps_one_row_per_date() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let user = db.create_user("n@example.com", None, "h").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let mut log = UserMealLog::placeholder(user.id, date);
        log.append_items(vec![item("Rice", 130.0)]);
        let first_id = db.save_meal_log(&log).await.unwrap();

        log.append_items(vec![item("Beans", 90.0)]);
        let second_id = db.save_meal_log(&log).await.unwrap();
        assert_eq!(first_id, second_id);

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_meal_logs WHERE user_id = ?")
                .bind(user.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_non_finite_totals_are_refused() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let user = db.create_user("o@example.com", None, "h").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();

        let mut log = UserMealLog::placeholder(user.id, date);
        log.append_items(vec![item("Rice", 1e308), item("Rice", 1e308)]);
        let err = db.save_meal_log(&log).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(db.get_meal_log(user.id, date).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_date_is_none() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert!(db.get_meal_log(1, date).await.unwrap().is_none());
    }
}
