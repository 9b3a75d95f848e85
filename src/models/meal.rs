// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Daily meal log documents and their macro aggregates.
//!
//! A meal log holds every food entry a user logged on one calendar date.
//! The macro totals are always derived from the entries: every mutation
//! recomputes them from the full item list instead of adjusting a running
//! sum, so a document can never drift from its contents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Id reported for a date that has no stored log yet.
pub const NO_LOG_ID: i64 = -1;

/// One food entry inside a meal log.
///
/// Macros are captured at logging time rather than referenced from the
/// food catalog, so later catalog edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoggedFoodItem {
    /// Opaque entry id; empty until the entry is stored.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_item_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0, max = 100_000.0))]
    pub quantity_g: f64,
    #[validate(range(min = 0.0, max = 100_000.0))]
    pub calories: f64,
    #[validate(range(min = 0.0, max = 100_000.0))]
    pub protein: f64,
    #[validate(range(min = 0.0, max = 100_000.0))]
    pub carbs: f64,
    #[validate(range(min = 0.0, max = 100_000.0))]
    pub fat: f64,
}

/// Ordered entries of a meal log (stored as the `food_items_json` blob).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MealLogContents {
    #[serde(default)]
    pub items: Vec<LoggedFoodItem>,
}

/// Summed macros over a set of logged entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroTotals {
    /// Elementwise sum of the four macro fields over `items`.
    pub fn from_items(items: &[LoggedFoodItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            calories: acc.calories + item.calories,
            protein: acc.protein + item.protein,
            carbs: acc.carbs + item.carbs,
            fat: acc.fat + item.fat,
        })
    }

    /// JSON has no encoding for NaN or infinity, so only finite totals can be stored.
    pub fn is_finite(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// One user's meal log for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserMealLog {
    /// Row id, or [`NO_LOG_ID`] for a placeholder.
    pub id: i64,
    pub user_id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub food_items: MealLogContents,
    pub total_macros: MacroTotals,
}

impl UserMealLog {
    /// Empty log returned for dates that have nothing stored.
    pub fn placeholder(user_id: i64, date: NaiveDate) -> Self {
        Self {
            id: NO_LOG_ID,
            user_id,
            date,
            food_items: MealLogContents::default(),
            total_macros: MacroTotals::default(),
        }
    }

    /// Whether this value stands in for a log that does not exist yet.
    pub fn is_placeholder(&self) -> bool {
        self.id == NO_LOG_ID
    }

    pub fn items(&self) -> &[LoggedFoodItem] {
        &self.food_items.items
    }

    /// Recompute `total_macros` from the current entries.
    pub fn recompute_totals(&mut self) {
        self.total_macros = MacroTotals::from_items(&self.food_items.items);
    }

    /// Append entries after the existing ones and recompute totals.
    ///
    /// Entries without an id, or whose id is already used in this log,
    /// receive a fresh one.
    pub fn append_items(&mut self, items: Vec<LoggedFoodItem>) {
        for mut item in items {
            if item.log_item_id.is_empty() || self.position_of(&item.log_item_id).is_some() {
                item.log_item_id = new_log_item_id();
            }
            self.food_items.items.push(item);
        }
        self.recompute_totals();
    }

    /// Replace the entry with `log_item_id` in place, keeping its id.
    ///
    /// Returns `false` (and changes nothing) if no entry has that id.
    pub fn replace_item(&mut self, log_item_id: &str, mut new_item: LoggedFoodItem) -> bool {
        let Some(index) = self.position_of(log_item_id) else {
            return false;
        };
        new_item.log_item_id = log_item_id.to_string();
        self.food_items.items[index] = new_item;
        self.recompute_totals();
        true
    }

    /// Remove the entry with `log_item_id`.
    ///
    /// Returns `false` (and changes nothing) if no entry has that id.
    pub fn remove_item(&mut self, log_item_id: &str) -> bool {
        let Some(index) = self.position_of(log_item_id) else {
            return false;
        };
        self.food_items.items.remove(index);
        self.recompute_totals();
        true
    }

    fn position_of(&self, log_item_id: &str) -> Option<usize> {
        self.food_items
            .items
            .iter()
            .position(|item| item.log_item_id == log_item_id)
    }
}

/// Generate a new opaque entry id.
pub fn new_log_item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, calories: f64) -> LoggedFoodItem {
        LoggedFoodItem {
            log_item_id: id.to_string(),
            name: name.to_string(),
            quantity_g: 100.0,
            calories,
            protein: calories / 10.0,
            carbs: calories / 5.0,
            fat: calories / 20.0,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_placeholder_is_empty() {
        let log = UserMealLog::placeholder(7, date());
        assert!(log.is_placeholder());
        assert!(log.items().is_empty());
        assert_eq!(log.total_macros, MacroTotals::default());
    }

    #[test]
    fn test_append_assigns_missing_ids_and_keeps_order() {
        let mut log = UserMealLog::placeholder(1, date());
        log.append_items(vec![item("", "Oats", 150.0)]);
        log.append_items(vec![item("", "Eggs", 140.0), item("keep-me", "Toast", 80.0)]);

        let names: Vec<&str> = log.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Oats", "Eggs", "Toast"]);
        assert!(log.items().iter().all(|i| !i.log_item_id.is_empty()));
        assert_eq!(log.items()[2].log_item_id, "keep-me");
        assert_eq!(log.total_macros.calories, 370.0);
    }

    #[test]
    fn test_append_reassigns_colliding_id() {
        let mut log = UserMealLog::placeholder(1, date());
        log.append_items(vec![item("dup", "Apple", 50.0)]);
        log.append_items(vec![item("dup", "Apple", 50.0)]);

        assert_eq!(log.items().len(), 2);
        assert_ne!(log.items()[0].log_item_id, log.items()[1].log_item_id);
    }

    #[test]
    fn test_append_recomputes_from_scratch() {
        let mut log = UserMealLog::placeholder(1, date());
        log.food_items.items.push(item("a", "Rice", 200.0));
        // Corrupted aggregate from a previous writer.
        log.total_macros.calories = 9999.0;

        log.append_items(vec![]);
        assert_eq!(log.total_macros, MacroTotals::from_items(log.items()));
    }

    #[test]
    fn test_replace_targets_id_not_position() {
        let mut log = UserMealLog::placeholder(1, date());
        log.append_items(vec![item("1", "A", 100.0), item("2", "B", 200.0)]);

        assert!(log.replace_item("2", item("", "C", 50.0)));
        assert_eq!(log.items()[0].name, "A");
        assert_eq!(log.items()[1].name, "C");
        assert_eq!(log.items()[1].log_item_id, "2");
        assert_eq!(log.total_macros.calories, 150.0);
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut log = UserMealLog::placeholder(1, date());
        log.append_items(vec![item("1", "A", 100.0), item("2", "B", 200.0)]);

        assert!(log.remove_item("1"));
        assert_eq!(log.items().len(), 1);
        assert_eq!(log.total_macros, MacroTotals::from_items(&[item("2", "B", 200.0)]));

        assert!(log.remove_item("2"));
        assert_eq!(log.total_macros, MacroTotals::default());
    }

    #[test]
    fn test_unknown_id_is_untouched() {
        let mut log = UserMealLog::placeholder(1, date());
        log.append_items(vec![item("1", "A", 100.0)]);
        let before = log.clone();

        assert!(!log.replace_item("nope", item("", "X", 1.0)));
        assert!(!log.remove_item("nope"));
        assert_eq!(log, before);
    }

    #[test]
    fn test_item_requires_every_macro_field() {
        let json = r#"{"name": "Banana", "quantity_g": 120, "calories": 105, "protein": 1.3, "carbs": 27}"#;
        assert!(serde_json::from_str::<LoggedFoodItem>(json).is_err());
    }

    #[test]
    fn test_item_validation_rejects_negative_macros() {
        let mut bad = item("", "Ghost", 10.0);
        bad.fat = -1.0;
        assert!(bad.validate().is_err());
        assert!(item("", "Real", 10.0).validate().is_ok());
    }

    #[test]
    fn test_item_validation_rejects_huge_macros() {
        let mut huge = item("", "Mountain", 10.0);
        huge.calories = 1e308;
        assert!(huge.validate().is_err());

        let mut heavy = item("", "Vat", 10.0);
        heavy.quantity_g = 250_000.0;
        assert!(heavy.validate().is_err());
    }

    #[test]
    fn test_overflowing_totals_are_not_finite() {
        let mut big = item("", "Mountain", 10.0);
        big.calories = 1e308;
        let totals = MacroTotals::from_items(&[big.clone(), big]);
        assert!(!totals.is_finite());
        assert!(MacroTotals::from_items(&[item("", "Real", 10.0)]).is_finite());
    }
}
