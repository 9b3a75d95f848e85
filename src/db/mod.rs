// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Database layer (SQLite via sqlx).
//!
//! Provides typed operations for:
//! - Users and profiles
//! - Food catalog entries
//! - Daily meal log documents
//! - Exercise catalog, workout plans and workout logs
//!
//! Nested lists are stored as JSON text columns and rehydrated on read.

mod exercises;
mod foods;
mod meals;
mod users;
mod workouts;

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT,
        hashed_password TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS user_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        age INTEGER,
        height REAL,
        weight REAL,
        goal TEXT,
        activity_level TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS food_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        calories_per_100g REAL NOT NULL,
        protein_per_100g REAL NOT NULL,
        carbs_per_100g REAL NOT NULL,
        fat_per_100g REAL NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_food_items_user_name ON food_items(user_id, name)",
    r"
    CREATE TABLE IF NOT EXISTS user_meal_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        food_items_json TEXT NOT NULL,
        total_macros_json TEXT NOT NULL,
        UNIQUE (user_id, date)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        muscle_group TEXT NOT NULL,
        equipment TEXT,
        difficulty TEXT NOT NULL,
        instructions TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS workout_plans (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        goal_type TEXT NOT NULL,
        plan_details_json TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_workout_plans_user ON workout_plans(user_id)",
    r"
    CREATE TABLE IF NOT EXISTS workout_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        notes TEXT,
        log_details_json TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_workout_logs_user_date ON workout_logs(user_id, date)",
];

/// SQLite database client.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and create any missing tables.
    ///
    /// `sqlite::memory:` URLs get a single long-lived connection, since every
    /// new connection would otherwise see its own empty database.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid DATABASE_URL: {}", e)))?
            .foreign_keys(true)
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;

        tracing::info!(in_memory, "Connected to database");
        Ok(db)
    }

    /// Create tables and indexes (idempotent).
    async fn migrate(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Parse an enum stored as TEXT, treating unknown values as corruption.
fn parse_stored<T: FromStr<Err = String>>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|e: String| AppError::Database(format!("Corrupt stored value: {}", e)))
}

/// Escape `%`, `_` and `\` so user text matches literally inside a LIKE pattern.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_tables() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = rows.iter().map(|t| t.0.as_str()).collect();
        for expected in [
            "users",
            "user_profiles",
            "food_items",
            "user_meal_logs",
            "exercises",
            "workout_plans",
            "workout_logs",
        ] {
            assert!(names.contains(&expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("oat"), "%oat%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
