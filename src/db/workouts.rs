// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Workout plan and workout log storage.
//!
//! Every lookup and delete is filtered by owner, so a foreign id behaves
//! exactly like a missing one.

use super::{parse_stored, Database};
use crate::error::AppError;
use crate::models::{NewWorkoutLog, NewWorkoutPlan, WorkoutLog, WorkoutPlan};
use chrono::NaiveDate;

#[derive(sqlx::FromRow)]
struct WorkoutPlanRow {
    id: i64,
    name: String,
    user_id: i64,
    goal_type: String,
    plan_details_json: String,
}

impl TryFrom<WorkoutPlanRow> for WorkoutPlan {
    type Error = AppError;

    fn try_from(row: WorkoutPlanRow) -> Result<Self, Self::Error> {
        Ok(WorkoutPlan {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            goal_type: parse_stored(&row.goal_type)?,
            exercises: serde_json::from_str(&row.plan_details_json)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct WorkoutLogRow {
    id: i64,
    date: NaiveDate,
    user_id: i64,
    notes: Option<String>,
    log_details_json: String,
}

impl TryFrom<WorkoutLogRow> for WorkoutLog {
    type Error = AppError;

    fn try_from(row: WorkoutLogRow) -> Result<Self, Self::Error> {
        Ok(WorkoutLog {
            id: row.id,
            date: row.date,
            user_id: row.user_id,
            notes: row.notes,
            exercises: serde_json::from_str(&row.log_details_json)?,
        })
    }
}

fn collect<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

impl Database {
    // ─── Workout Plans ───────────────────────────────────────────

    /// Store a new plan with its exercise list serialized as one unit.
    pub async fn create_workout_plan(
        &self,
        user_id: i64,
        plan: &NewWorkoutPlan,
    ) -> Result<WorkoutPlan, AppError> {
        let plan_details_json = serde_json::to_string(&plan.exercises)?;

        sqlx::query_as::<_, WorkoutPlanRow>(
            r"
            INSERT INTO workout_plans (name, user_id, goal_type, plan_details_json)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, user_id, goal_type, plan_details_json
            ",
        )
        .bind(&plan.name)
        .bind(user_id)
        .bind(plan.goal_type.as_str())
        .bind(&plan_details_json)
        .fetch_one(self.pool())
        .await?
        .try_into()
    }

    /// All plans owned by a user, oldest first.
    pub async fn list_workout_plans(&self, user_id: i64) -> Result<Vec<WorkoutPlan>, AppError> {
        let rows = sqlx::query_as::<_, WorkoutPlanRow>(
            r"
            SELECT id, name, user_id, goal_type, plan_details_json
            FROM workout_plans WHERE user_id = ? ORDER BY id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        collect(rows)
    }

    /// Get a plan if it exists and belongs to `user_id`.
    pub async fn get_workout_plan(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<Option<WorkoutPlan>, AppError> {
        sqlx::query_as::<_, WorkoutPlanRow>(
            r"
            SELECT id, name, user_id, goal_type, plan_details_json
            FROM workout_plans WHERE id = ? AND user_id = ?
            ",
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .map(WorkoutPlan::try_from)
        .transpose()
    }

    /// Delete a plan owned by `user_id`. Returns `false` if nothing matched.
    pub async fn delete_workout_plan(&self, plan_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM workout_plans WHERE id = ? AND user_id = ?")
            .bind(plan_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Workout Logs ────────────────────────────────────────────

    /// Store a completed workout.
    pub async fn create_workout_log(
        &self,
        user_id: i64,
        log: &NewWorkoutLog,
    ) -> Result<WorkoutLog, AppError> {
        let log_details_json = serde_json::to_string(&log.exercises)?;

        sqlx::query_as::<_, WorkoutLogRow>(
            r"
            INSERT INTO workout_logs (date, user_id, notes, log_details_json)
            VALUES (?, ?, ?, ?)
            RETURNING id, date, user_id, notes, log_details_json
            ",
        )
        .bind(log.date)
        .bind(user_id)
        .bind(&log.notes)
        .bind(&log_details_json)
        .fetch_one(self.pool())
        .await?
        .try_into()
    }

    /// Logs owned by a user with `start <= date <= end`, ordered by date.
    pub async fn list_workout_logs(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutLog>, AppError> {
        let rows = sqlx::query_as::<_, WorkoutLogRow>(
            r"
            SELECT id, date, user_id, notes, log_details_json
            FROM workout_logs
            WHERE user_id = ? AND date >= ? AND date <= ?
            ORDER BY date, id
            ",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;
        collect(rows)
    }

    /// Get a log if it exists and belongs to `user_id`.
    pub async fn get_workout_log(
        &self,
        log_id: i64,
        user_id: i64,
    ) -> Result<Option<WorkoutLog>, AppError> {
        sqlx::query_as::<_, WorkoutLogRow>(
            r"
            SELECT id, date, user_id, notes, log_details_json
            FROM workout_logs WHERE id = ? AND user_id = ?
            ",
        )
        .bind(log_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .map(WorkoutLog::try_from)
        .transpose()
    }

    /// Delete a log owned by `user_id`. Returns `false` if nothing matched.
    pub async fn delete_workout_log(&self, log_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM workout_logs WHERE id = ? AND user_id = ?")
            .bind(log_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoggedExercise, LoggedSet, PlanExercise, WorkoutGoalType};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn new_log(date: NaiveDate) -> NewWorkoutLog {
        NewWorkoutLog {
            date,
            notes: Some("felt strong".to_string()),
            exercises: vec![LoggedExercise {
                log_exercise_id: "le-1".to_string(),
                exercise_id: 2,
                exercise_name: "Squat".to_string(),
                sets: vec![
                    LoggedSet { reps: 5, weight: 100.0 },
                    LoggedSet { reps: 5, weight: 102.5 },
                ],
            }],
        }
    }

    #[tokio::test]
    async fn test_plan_round_trip_and_ownership() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let owner = db.create_user("o@example.com", None, "h").await.unwrap();
        let other = db.create_user("x@example.com", None, "h").await.unwrap();

        let plan = db
            .create_workout_plan(
                owner.id,
                &NewWorkoutPlan {
                    name: "Push day".to_string(),
                    goal_type: WorkoutGoalType::Hypertrophy,
                    exercises: vec![PlanExercise {
                        exercise_id: 1,
                        name: "Bench Press".to_string(),
                        sets: 4,
                        reps: "8-10".to_string(),
                    }],
                },
            )
            .await
            .unwrap();

        assert_eq!(db.get_workout_plan(plan.id, owner.id).await.unwrap(), Some(plan.clone()));
        assert_eq!(db.get_workout_plan(plan.id, other.id).await.unwrap(), None);
        assert!(!db.delete_workout_plan(plan.id, other.id).await.unwrap());
        assert!(db.delete_workout_plan(plan.id, owner.id).await.unwrap());
        assert!(db.list_workout_plans(owner.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_log_range_is_inclusive() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let user = db.create_user("r@example.com", None, "h").await.unwrap();

        for d in [1, 5, 10, 11] {
            db.create_workout_log(user.id, &new_log(day(d))).await.unwrap();
        }

        let logs = db.list_workout_logs(user.id, day(5), day(10)).await.unwrap();
        let dates: Vec<NaiveDate> = logs.iter().map(|l| l.date).collect();
        assert_eq!(dates, vec![day(5), day(10)]);
        assert_eq!(logs[0].exercises[0].sets.len(), 2);
    }
}
