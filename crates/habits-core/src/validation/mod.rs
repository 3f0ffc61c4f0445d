//! Input validation rules
//!
//! Pure functions over habit and user fields; no I/O.

mod habit;
mod user;

pub use habit::{validate_habit, HabitFields, MAX_HABIT_DAYS, MAX_HABIT_NAME_LEN};
pub use user::{
    is_valid_email, is_valid_name, is_valid_password, MAX_EMAIL_LEN, MAX_NAME_LEN,
    MAX_PASSWORD_LEN, MIN_PASSWORD_LEN,
};
