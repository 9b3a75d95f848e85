// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Exercise catalog, workout plans and workout logs.
//!
//! Plans and logs keep their nested exercise lists as one serialized unit;
//! unlike meal logs there is no per-entry update and no aggregate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Primary muscle group trained by an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Biceps,
    Triceps,
    Core,
    FullBody,
    Cardio,
}

/// Exercise difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// What a workout plan is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutGoalType {
    Strength,
    Hypertrophy,
    Endurance,
    WeightLoss,
    GeneralFitness,
}

macro_rules! str_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!("unknown {}: {}", stringify!($ty), other)),
                }
            }
        }
    };
}

str_enum!(MuscleGroup {
    Chest => "chest",
    Back => "back",
    Legs => "legs",
    Shoulders => "shoulders",
    Biceps => "biceps",
    Triceps => "triceps",
    Core => "core",
    FullBody => "full_body",
    Cardio => "cardio",
});

str_enum!(Difficulty {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

str_enum!(WorkoutGoalType {
    Strength => "strength",
    Hypertrophy => "hypertrophy",
    Endurance => "endurance",
    WeightLoss => "weight_loss",
    GeneralFitness => "general_fitness",
});

/// Entry in the shared exercise catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: Option<String>,
    pub difficulty: Difficulty,
    pub instructions: Option<String>,
}

/// An exercise prescribed by a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlanExercise {
    pub exercise_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1, max = 100))]
    pub sets: u32,
    /// Rep target, e.g. "8-10" or "15"
    #[validate(length(min = 1, max = 20))]
    pub reps: String,
}

/// A reusable workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub goal_type: WorkoutGoalType,
    pub exercises: Vec<PlanExercise>,
}

/// Payload for creating a plan.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewWorkoutPlan {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub goal_type: WorkoutGoalType,
    #[validate(nested)]
    pub exercises: Vec<PlanExercise>,
}

/// One performed set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoggedSet {
    #[validate(range(min = 0, max = 10000))]
    pub reps: u32,
    /// Load in kg (fractional plates allowed)
    #[validate(range(min = 0.0, max = 10_000.0))]
    pub weight: f64,
}

/// An exercise as performed within a workout log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoggedExercise {
    #[serde(default = "new_log_exercise_id")]
    pub log_exercise_id: String,
    pub exercise_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub exercise_name: String,
    #[validate(nested)]
    pub sets: Vec<LoggedSet>,
}

/// A completed workout on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: i64,
    pub date: NaiveDate,
    pub user_id: i64,
    pub notes: Option<String>,
    pub exercises: Vec<LoggedExercise>,
}

/// Payload for logging a workout.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewWorkoutLog {
    pub date: NaiveDate,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(nested)]
    pub exercises: Vec<LoggedExercise>,
}

fn new_log_exercise_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
