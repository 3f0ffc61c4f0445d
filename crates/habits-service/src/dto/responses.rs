//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. None of them
//! carries a password hash.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Habit Responses
// ============================================================================

/// Full habit view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

/// View returned by habit creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedHabitResponse {
    pub habit_id: String,
    pub name: String,
    pub days: i32,
    pub days_target: i32,
    pub completion_dates: Vec<String>,
}

/// Habit deletion acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
}

impl DeleteHabitResponse {
    pub fn deleted() -> Self {
        Self { success: true }
    }
}

// ============================================================================
// User / Auth Responses
// ============================================================================

/// Public user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserResponse {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Login body; the tokens travel in headers and cookies
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserResponse,
    pub logged_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogoutResponse {
    pub success: bool,
    pub email_address: String,
    pub logged_out_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub email_address: String,
}

// ============================================================================
// Health Check Responses
// ============================================================================

/// Liveness check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            version: version.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health of each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
    pub backend: String,
}

impl ReadinessResponse {
    pub fn ready(backend: &str, store_healthy: bool) -> Self {
        Self {
            status: if store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
                backend: backend.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserResponse {
        UserResponse {
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email_address: "janesmith@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_habit_response_keys() {
        let habit = HabitResponse {
            habit_id: "1".to_string(),
            user_id: "2".to_string(),
            created_at: Utc::now(),
            name: "Read".to_string(),
            days: 5,
            days_target: 30,
            completion_dates: vec![],
        };

        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["habitId"], "1");
        assert_eq!(json["userId"], "2");
        assert_eq!(json["daysTarget"], 30);
        assert!(json["completionDates"].as_array().unwrap().is_empty());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_login_response_keys() {
        let response = LoginResponse {
            success: true,
            user: sample_user(),
            logged_in_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["Success"], true);
        assert_eq!(json["User"]["EmailAddress"], "janesmith@example.com");
        assert!(json["User"].get("Password").is_none());
        assert!(json.get("LoggedInAt").is_some());
    }

    #[test]
    fn test_delete_response() {
        let json = serde_json::to_string(&DeleteHabitResponse::deleted()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy("1.0.0");
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, "1.0.0");
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready("memory", true);
        assert!(ready.is_ready());
        assert_eq!(ready.checks.store, "healthy");

        let not_ready = ReadinessResponse::ready("mongodb", false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.store, "unhealthy");
    }
}
