//! Habit entity - a tracked recurring behavior

use chrono::{DateTime, Utc};

/// A habit owned by a single user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    /// Running count of days the habit was completed
    pub days: i32,
    pub days_target: i32,
    pub completion_dates: Vec<String>,
}

impl Habit {
    /// Merge a partial update into this habit
    ///
    /// Fields that are `None` in `changes` keep their current value.
    pub fn apply(&mut self, changes: HabitChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(days) = changes.days {
            self.days = days;
        }
        if let Some(days_target) = changes.days_target {
            self.days_target = days_target;
        }
        if let Some(completion_dates) = changes.completion_dates {
            self.completion_dates = completion_dates;
        }
    }

    /// Returns a copy of this habit with `changes` applied
    pub fn merged(&self, changes: HabitChanges) -> Self {
        let mut habit = self.clone();
        habit.apply(changes);
        habit
    }
}

/// Data required to create a habit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub days: i32,
    pub days_target: i32,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, days: i32, days_target: i32) -> Self {
        Self {
            name: name.into(),
            days,
            days_target,
        }
    }
}

/// Partial update for an existing habit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub days: Option<i32>,
    pub days_target: Option<i32>,
    pub completion_dates: Option<Vec<String>>,
}
