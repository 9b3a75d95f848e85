// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Meal log store: the read-modify-write layer over per-date documents.
//!
//! Every mutation loads the whole document for (user, date), changes the
//! entry list, recomputes totals from scratch and writes the whole document
//! back. Mutations on the same (user, date) are serialized by a per-key lock
//! so concurrent appends cannot lose each other's entries; the store's
//! unique (user_id, date) index guarantees a single document per date.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{LoggedFoodItem, UserMealLog};
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockKey = (i64, NaiveDate);

/// Shared per-(user, date) write locks.
pub type MealLogLocks = Arc<DashMap<LockKey, Arc<Mutex<()>>>>;

/// Guard for one (user, date) key; drops the map entry once nobody else
/// is holding or waiting on it.
struct KeyGuard {
    locks: MealLogLocks,
    key: LockKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[derive(Clone)]
pub struct MealLogService {
    db: Database,
    locks: MealLogLocks,
}

impl MealLogService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            locks: Arc::new(DashMap::new()),
        }
    }

    async fn lock(&self, user_id: i64, date: NaiveDate) -> KeyGuard {
        let key = (user_id, date);
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        KeyGuard {
            locks: self.locks.clone(),
            key,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// The stored log for `date`, or an empty placeholder (never persisted).
    pub async fn read(&self, user_id: i64, date: NaiveDate) -> Result<UserMealLog, AppError> {
        Ok(self
            .db
            .get_meal_log(user_id, date)
            .await?
            .unwrap_or_else(|| UserMealLog::placeholder(user_id, date)))
    }

    /// Append entries to the log for `date`, creating it on first use.
    ///
    /// Appending nothing to a date with no log returns the placeholder
    /// without writing, so no empty document is ever created.
    pub async fn append(
        &self,
        user_id: i64,
        date: NaiveDate,
        items: Vec<LoggedFoodItem>,
    ) -> Result<UserMealLog, AppError> {
        let _guard = self.lock(user_id, date).await;

        let mut log = self.read(user_id, date).await?;
        if items.is_empty() && log.is_placeholder() {
            return Ok(log);
        }

        let added = items.len();
        log.append_items(items);
        log.id = self.db.save_meal_log(&log).await?;

        tracing::info!(
            user_id,
            %date,
            added,
            total_items = log.items().len(),
            "Appended meal log entries"
        );
        Ok(log)
    }

    /// Replace the entry `log_item_id` in the log for `date`.
    pub async fn update_item(
        &self,
        user_id: i64,
        date: NaiveDate,
        log_item_id: &str,
        new_item: LoggedFoodItem,
    ) -> Result<UserMealLog, AppError> {
        let _guard = self.lock(user_id, date).await;

        let mut log = self.existing(user_id, date).await?;
        if !log.replace_item(log_item_id, new_item) {
            return Err(item_not_found(log_item_id));
        }
        self.db.save_meal_log(&log).await?;

        tracing::info!(user_id, %date, log_item_id, "Updated meal log entry");
        Ok(log)
    }

    /// Remove the entry `log_item_id` from the log for `date`.
    ///
    /// The document stays even when its last entry is removed.
    pub async fn delete_item(
        &self,
        user_id: i64,
        date: NaiveDate,
        log_item_id: &str,
    ) -> Result<UserMealLog, AppError> {
        let _guard = self.lock(user_id, date).await;

        let mut log = self.existing(user_id, date).await?;
        if !log.remove_item(log_item_id) {
            return Err(item_not_found(log_item_id));
        }
        self.db.save_meal_log(&log).await?;

        tracing::info!(user_id, %date, log_item_id, "Deleted meal log entry");
        Ok(log)
    }

    async fn existing(&self, user_id: i64, date: NaiveDate) -> Result<UserMealLog, AppError> {
        self.db
            .get_meal_log(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Meal log for {}", date)))
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.len()
    }
}

fn item_not_found(log_item_id: &str) -> AppError {
    AppError::NotFound(format!("Log item {}", log_item_id))
}
