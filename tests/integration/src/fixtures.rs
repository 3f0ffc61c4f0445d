//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Password accepted by the registration rules
pub const TEST_PASSWORD: &str = "TestPass123!";

/// Registration request
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "EmailAddress")]
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// A registration with an email no other test uses
    pub fn unique() -> Self {
        Self {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("test{}@example.com", Uuid::new_v4().simple()),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "EmailAddress")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self::new(&reg.email, &reg.password)
    }
}

/// Refresh request
#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    #[serde(rename = "EmailAddress")]
    pub email: String,
}

/// User view
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserResponse {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub created_at: DateTime<Utc>,
}

/// Registration response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Login response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserResponse,
    pub logged_in_at: DateTime<Utc>,
}

/// Logout response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogoutResponse {
    pub success: bool,
    pub email_address: String,
    pub logged_out_at: DateTime<Utc>,
}

/// Create habit request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub name: String,
    pub days: i32,
    pub days_target: i32,
}

impl CreateHabitRequest {
    pub fn new(name: impl Into<String>, days: i32, days_target: i32) -> Self {
        Self {
            name: name.into(),
            days,
            days_target,
        }
    }
}

/// Partial habit update; absent fields are left out of the body
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_target: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_dates: Option<Vec<String>>,
}

/// Entry of a bulk habit update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkHabitUpdate {
    pub habit_id: String,
    #[serde(flatten)]
    pub changes: UpdateHabitRequest,
}

/// Habit returned on creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedHabitResponse {
    pub habit_id: String,
    pub name: String,
    pub days: i32,
    pub days_target: i32,
    pub completion_dates: Vec<String>,
}

/// Stored habit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitResponse {
    pub habit_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub days: i32,
    pub days_target: i32,
    pub completion_dates: Vec<String>,
}

/// Habit deletion acknowledgement
#[derive(Debug, Deserialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
}

/// Error body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
