//! Exercise catalog storage and seed data.

use super::{like_pattern, parse_stored, Database};
use crate::error::AppError;
use crate::models::{Difficulty, Exercise, MuscleGroup};

/// Built-in catalog inserted at startup: (name, muscle group, equipment, difficulty).
const SEED_EXERCISES: &[(&str, MuscleGroup, &str, Difficulty)] = &[
    ("Bench Press", MuscleGroup::Chest, "barbell", Difficulty::Intermediate),
    ("Squat", MuscleGroup::Legs, "barbell", Difficulty::Intermediate),
    ("Deadlift", MuscleGroup::Back, "barbell", Difficulty::Advanced),
    ("Crunches", MuscleGroup::Core, "body_only", Difficulty::Beginner),
    ("Push-up", MuscleGroup::Chest, "body_only", Difficulty::Beginner),
    ("Pull-up", MuscleGroup::Back, "pull_up_bar", Difficulty::Intermediate),
    ("Overhead Press", MuscleGroup::Shoulders, "barbell", Difficulty::Intermediate),
    ("Dumbbell Curl", MuscleGroup::Biceps, "dumbbell", Difficulty::Beginner),
    ("Tricep Dip", MuscleGroup::Triceps, "body_only", Difficulty::Intermediate),
    ("Lunge", MuscleGroup::Legs, "body_only", Difficulty::Beginner),
    ("Plank", MuscleGroup::Core, "body_only", Difficulty::Beginner),
    ("Lat Pulldown", MuscleGroup::Back, "cable", Difficulty::Beginner),
    ("Leg Press", MuscleGroup::Legs, "machine", Difficulty::Beginner),
    ("Dumbbell Shoulder Press", MuscleGroup::Shoulders, "dumbbell", Difficulty::Intermediate),
    ("Bicep Curl (Barbell)", MuscleGroup::Biceps, "barbell", Difficulty::Beginner),
    ("Tricep Pushdown", MuscleGroup::Triceps, "cable", Difficulty::Beginner),
    ("Burpee", MuscleGroup::FullBody, "body_only", Difficulty::Intermediate),
    ("Rowing Machine", MuscleGroup::Cardio, "machine", Difficulty::Beginner),
];

#[derive(sqlx::FromRow)]
struct ExerciseRow {
    id: i64,
    name: String,
    muscle_group: String,
    equipment: Option<String>,
    difficulty: String,
    instructions: Option<String>,
}

impl TryFrom<ExerciseRow> for Exercise {
    type Error = AppError;

    fn try_from(row: ExerciseRow) -> Result<Self, Self::Error> {
        Ok(Exercise {
            id: row.id,
            name: row.name,
            muscle_group: parse_stored(&row.muscle_group)?,
            equipment: row.equipment,
            difficulty: parse_stored(&row.difficulty)?,
            instructions: row.instructions,
        })
    }
}

impl Database {
    /// Insert the built-in exercises that are not present yet.
    ///
    /// Returns how many rows were added.
    pub async fn seed_exercises(&self) -> Result<u64, AppError> {
        let mut added = 0;
        for (name, muscle_group, equipment, difficulty) in SEED_EXERCISES {
            let result = sqlx::query(
                r"
                INSERT INTO exercises (name, muscle_group, equipment, difficulty)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (name) DO NOTHING
                ",
            )
            .bind(*name)
            .bind(muscle_group.as_str())
            .bind(*equipment)
            .bind(difficulty.as_str())
            .execute(self.pool())
            .await?;
            added += result.rows_affected();
        }
        Ok(added)
    }

    /// Page through the catalog in id order.
    pub async fn list_exercises(&self, skip: i64, limit: i64) -> Result<Vec<Exercise>, AppError> {
        sqlx::query_as::<_, ExerciseRow>(
            r"
            SELECT id, name, muscle_group, equipment, difficulty, instructions
            FROM exercises ORDER BY id LIMIT ? OFFSET ?
            ",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(Exercise::try_from)
        .collect()
    }

    /// Case-insensitive substring search by name.
    pub async fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>, AppError> {
        sqlx::query_as::<_, ExerciseRow>(
            r"
            SELECT id, name, muscle_group, equipment, difficulty, instructions
            FROM exercises WHERE name LIKE ? ESCAPE '\' ORDER BY name
            ",
        )
        .bind(like_pattern(query))
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(Exercise::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let first = db.seed_exercises().await.unwrap();
        assert_eq!(first, SEED_EXERCISES.len() as u64);
        assert_eq!(db.seed_exercises().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_and_paging() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.seed_exercises().await.unwrap();

        let curls = db.search_exercises("curl").await.unwrap();
        assert_eq!(curls.len(), 2);
        assert!(curls.iter().all(|e| e.muscle_group == MuscleGroup::Biceps));

        let page = db.list_exercises(2, 3).await.unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].name, "Deadlift");
    }
}
