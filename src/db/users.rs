//! User account and profile storage.

use super::{is_unique_violation, parse_stored, Database};
use crate::error::AppError;
use crate::models::{ProfileFields, User, UserProfile};

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    user_id: i64,
    age: Option<i64>,
    height: Option<f64>,
    weight: Option<f64>,
    goal: Option<String>,
    activity_level: Option<String>,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: row.id,
            user_id: row.user_id,
            age: row.age,
            height: row.height,
            weight: row.weight,
            goal: row.goal.as_deref().map(parse_stored).transpose()?,
            activity_level: row.activity_level.as_deref().map(parse_stored).transpose()?,
        })
    }
}

impl Database {
    // ─── User Operations ─────────────────────────────────────────

    /// Create a user. Fails with `Conflict` if the email is taken.
    pub async fn create_user(
        &self,
        email: &str,
        full_name: Option<&str>,
        hashed_password: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (email, full_name, hashed_password, is_active)
            VALUES (?, ?, ?, 1)
            RETURNING id, email, full_name, hashed_password, is_active
            ",
        )
        .bind(email)
        .bind(full_name)
        .bind(hashed_password)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                e.into()
            }
        })
    }

    /// Get a user by id.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, hashed_password, is_active FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?)
    }

    /// Get a user by email (exact match).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, hashed_password, is_active FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?)
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get the profile for a user, if one was created.
    pub async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, AppError> {
        sqlx::query_as::<_, ProfileRow>(
            r"
            SELECT id, user_id, age, height, weight, goal, activity_level
            FROM user_profiles WHERE user_id = ?
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .map(UserProfile::try_from)
        .transpose()
    }

    /// Create a user's profile. Fails with `Conflict` if one exists.
    pub async fn create_profile(
        &self,
        user_id: i64,
        fields: ProfileFields,
    ) -> Result<UserProfile, AppError> {
        let fields = fields.with_defaults();

        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            INSERT INTO user_profiles (user_id, age, height, weight, goal, activity_level)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, age, height, weight, goal, activity_level
            ",
        )
        .bind(user_id)
        .bind(fields.age)
        .bind(fields.height)
        .bind(fields.weight)
        .bind(fields.goal.map(|g| g.as_str()))
        .bind(fields.activity_level.map(|a| a.as_str()))
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Profile already exists for this user".to_string())
            } else {
                e.into()
            }
        })?;

        row.try_into()
    }

    /// Persist every field of an existing profile.
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        sqlx::query(
            r"
            UPDATE user_profiles
            SET age = ?, height = ?, weight = ?, goal = ?, activity_level = ?
            WHERE id = ? AND user_id = ?
            ",
        )
        .bind(profile.age)
        .bind(profile.height)
        .bind(profile.weight)
        .bind(profile.goal.map(|g| g.as_str()))
        .bind(profile.activity_level.map(|a| a.as_str()))
        .bind(profile.id)
        .bind(profile.user_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
