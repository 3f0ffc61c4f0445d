//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid day count: {0} (must be between 0 and 9998)")]
    InvalidHabitDays(i32),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("No active session for user {0}")]
    SessionNotFound(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Malformed {entity} document: field `{field}` {reason}")]
    DecodeError {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Store operation timed out: {0}")]
    Timeout(&'static str),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::HabitNotFound(_) => "UNKNOWN_HABIT",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            // Validation
            Self::InvalidHabitName(_) => "INVALID_HABIT_NAME",
            Self::InvalidHabitDays(_) => "INVALID_HABIT_DAYS",
            Self::InvalidId(_) => "INVALID_ID",

            // Authentication
            Self::SessionNotFound(_) => "NO_ACTIVE_SESSION",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Infrastructure
            Self::ConnectionError(_) => "CONNECTION_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::DecodeError { .. } => "DECODE_ERROR",
            Self::Timeout(_) => "STORE_TIMEOUT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HabitNotFound(_) | Self::UserNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidHabitName(_) | Self::InvalidHabitDays(_) | Self::InvalidId(_)
        )
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists)
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authentication() {
            401
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
