//! Request DTOs for API endpoints
//!
//! Auth requests use PascalCase keys and implement `Validate`; habit requests
//! use camelCase keys and are validated as merged domain values.

use habits_core::entities::{HabitChanges, NewHabit};
use habits_core::validation::{is_valid_email, is_valid_name, is_valid_password};
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn check(valid: bool, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(code).with_message(message.into()))
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    check(
        is_valid_name(name),
        "name",
        "Names must be 1-50 letters, spaces, apostrophes or hyphens",
    )
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    check(is_valid_email(email), "email", "Invalid email format")
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    check(
        is_valid_password(password),
        "password",
        "Password must be 8-72 characters from the allowed set",
    )
}

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_name"))]
    pub first_name: String,

    #[validate(custom(function = "validate_name"))]
    pub last_name: String,

    #[serde(rename = "EmailAddress")]
    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    #[serde(rename = "EmailAddress")]
    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Access token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[serde(rename = "EmailAddress")]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
}

// ============================================================================
// Habit Requests
// ============================================================================

/// Create habit request
///
/// Missing day counts default to zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub name: String,

    #[serde(default)]
    pub days: i32,

    #[serde(default)]
    pub days_target: i32,
}

impl From<CreateHabitRequest> for NewHabit {
    fn from(request: CreateHabitRequest) -> Self {
        NewHabit::new(request.name, request.days, request.days_target)
    }
}

/// Partial habit update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub days: Option<i32>,
    pub days_target: Option<i32>,
    pub completion_dates: Option<Vec<String>>,
}

impl From<UpdateHabitRequest> for HabitChanges {
    fn from(request: UpdateHabitRequest) -> Self {
        HabitChanges {
            name: request.name,
            days: request.days,
            days_target: request.days_target,
            completion_dates: request.completion_dates,
        }
    }
}

/// One entry of a bulk habit update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkHabitUpdate {
    pub habit_id: String,

    #[serde(flatten)]
    pub changes: UpdateHabitRequest,
}
