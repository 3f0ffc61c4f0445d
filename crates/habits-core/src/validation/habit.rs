//! Habit validation

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::{Habit, NewHabit};
use crate::error::DomainError;

/// Longest accepted habit name, in characters
pub const MAX_HABIT_NAME_LEN: usize = 254;

/// Exclusive upper bound for day counts
pub const MAX_HABIT_DAYS: i32 = 9999;

static HABIT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9: ]+$").expect("valid regex"));

/// Fields shared by every habit shape that gets validated
pub trait HabitFields {
    fn name(&self) -> &str;
    fn days(&self) -> i32;
    fn days_target(&self) -> i32;
}

impl HabitFields for NewHabit {
    fn name(&self) -> &str {
        &self.name
    }

    fn days(&self) -> i32 {
        self.days
    }

    fn days_target(&self) -> i32 {
        self.days_target
    }
}

impl HabitFields for Habit {
    fn name(&self) -> &str {
        &self.name
    }

    fn days(&self) -> i32 {
        self.days
    }

    fn days_target(&self) -> i32 {
        self.days_target
    }
}

/// Validate a habit's name and day counts
///
/// The name must be 1-254 characters of letters, digits, colons and spaces.
/// Both day counts must lie in `0..9999`.
pub fn validate_habit(habit: &impl HabitFields) -> Result<(), DomainError> {
    let name = habit.name();

    if name.is_empty() {
        return Err(DomainError::InvalidHabitName("name is required".to_string()));
    }
    if name.chars().count() > MAX_HABIT_NAME_LEN {
        return Err(DomainError::InvalidHabitName(format!(
            "name must be at most {MAX_HABIT_NAME_LEN} characters"
        )));
    }
    if !HABIT_NAME_RE.is_match(name) {
        return Err(DomainError::InvalidHabitName(
            "name may only contain letters, digits, colons and spaces".to_string(),
        ));
    }

    for days in [habit.days(), habit.days_target()] {
        if !(0..MAX_HABIT_DAYS).contains(&days) {
            return Err(DomainError::InvalidHabitDays(days));
        }
    }

    Ok(())
}
