// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Data models for the application.

pub mod food;
pub mod meal;
pub mod user;
pub mod workout;

pub use food::{FoodItem, NewFoodItem};
pub use meal::{LoggedFoodItem, MacroTotals, MealLogContents, UserMealLog};
pub use user::{ActivityLevel, Goal, ProfileFields, User, UserProfile};
pub use workout::{
    Difficulty, Exercise, LoggedExercise, LoggedSet, MuscleGroup, NewWorkoutLog, NewWorkoutPlan,
    PlanExercise, WorkoutGoalType, WorkoutLog, WorkoutPlan,
};
