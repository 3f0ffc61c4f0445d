//! User session - the persisted half of a login

use chrono::{DateTime, Utc};

/// Session record created on login and removed on logout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// Assigned at login; sessions are still looked up by `user_id`
    pub id: String,
    pub user_id: String,
    pub refresh_token: String,
    pub device: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}
