//! User account and profile models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Stored user account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    /// bcrypt hash of the password
    pub hashed_password: String,
    pub is_active: bool,
}

/// Body-composition goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    #[default]
    MaintainWeight,
    GainMuscle,
}

/// Self-reported daily activity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::MaintainWeight => "maintain_weight",
            Goal::GainMuscle => "gain_muscle",
        }
    }
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lose_weight" => Ok(Goal::LoseWeight),
            "maintain_weight" => Ok(Goal::MaintainWeight),
            "gain_muscle" => Ok(Goal::GainMuscle),
            other => Err(format!("unknown goal: {}", other)),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            other => Err(format!("unknown activity level: {}", other)),
        }
    }
}

/// Profile attributes attached to an account (one per user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub age: Option<i64>,
    /// Height in cm
    pub height: Option<f64>,
    /// Weight in kg
    pub weight: Option<f64>,
    pub goal: Option<Goal>,
    pub activity_level: Option<ActivityLevel>,
}

/// Profile fields accepted on create and update.
///
/// On update only the fields present in the request are changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileFields {
    #[validate(range(min = 1, max = 130))]
    pub age: Option<i64>,
    #[validate(range(min = 30.0, max = 300.0))]
    pub height: Option<f64>,
    #[validate(range(min = 1.0, max = 700.0))]
    pub weight: Option<f64>,
    pub goal: Option<Goal>,
    pub activity_level: Option<ActivityLevel>,
}

impl ProfileFields {
    /// Fill in the defaults a freshly created profile starts with.
    pub fn with_defaults(mut self) -> Self {
        self.goal.get_or_insert(Goal::default());
        self.activity_level.get_or_insert(ActivityLevel::default());
        self
    }
}

impl UserProfile {
    /// Apply the fields present in `fields`, leaving the rest unchanged.
    pub fn apply(&mut self, fields: ProfileFields) {
        if fields.age.is_some() {
            self.age = fields.age;
        }
        if fields.height.is_some() {
            self.height = fields.height;
        }
        if fields.weight.is_some() {
            self.weight = fields.weight;
        }
        if fields.goal.is_some() {
            self.goal = fields.goal;
        }
        if fields.activity_level.is_some() {
            self.activity_level = fields.activity_level;
        }
    }
}
