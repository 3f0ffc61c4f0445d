//! User entity - an account that owns habits

use chrono::{DateTime, Utc};

/// A registered user
///
/// `password_hash` is the stored one-way hash; it never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_logged_in: bool,
}

impl User {
    /// Display name as "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Mark the user as logged in at `at`
    pub fn mark_logged_in(&mut self, at: DateTime<Utc>) {
        self.is_logged_in = true;
        self.last_login = Some(at);
    }

    /// Clear the logged-in flag
    pub fn mark_logged_out(&mut self) {
        self.is_logged_in = false;
    }
}

/// Data required to register a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
