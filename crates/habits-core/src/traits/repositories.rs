//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Identifiers cross this boundary as opaque
//! strings; each store resolves them to its native key type.

use async_trait::async_trait;

use crate::entities::{Habit, NewHabit, NewUser, User, UserSession};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Habit Repository
// ============================================================================

/// Habit persistence, always scoped to the owning user
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Store a new habit, assigning its id and creation time
    async fn create_habit(&self, user_id: &str, habit: &NewHabit) -> RepoResult<Habit>;

    /// Find one of the user's habits
    async fn find_habit(&self, user_id: &str, habit_id: &str) -> RepoResult<Option<Habit>>;

    /// List all of the user's habits
    async fn find_habits(&self, user_id: &str) -> RepoResult<Vec<Habit>>;

    /// Overwrite the mutable fields of an existing habit
    ///
    /// Returns `HabitNotFound` when the user owns no habit with that id.
    async fn update_habit(&self, user_id: &str, habit: &Habit) -> RepoResult<()>;

    /// Overwrite several habits at once
    async fn update_habits(&self, user_id: &str, habits: &[Habit]) -> RepoResult<()>;

    /// Delete a habit, `HabitNotFound` if it does not exist
    async fn delete_habit(&self, user_id: &str, habit_id: &str) -> RepoResult<()>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by email
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Insert a new user, `EmailAlreadyExists` on a duplicate address
    async fn create_user(&self, user: &NewUser) -> RepoResult<User>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find the active session of a user
    async fn find_session(&self, user_id: &str) -> RepoResult<Option<UserSession>>;

    /// Record a login: insert the session and mark the user logged in
    ///
    /// Both effects happen or neither does.
    async fn login(&self, session: &UserSession) -> RepoResult<()>;

    /// Remove the user's session and clear the logged-in flag
    ///
    /// Returns `SessionNotFound` when the user has no active session.
    async fn logout(&self, user_id: &str) -> RepoResult<()>;
}

// ============================================================================
// Store
// ============================================================================

/// A complete backing store
#[async_trait]
pub trait Store: HabitRepository + UserRepository + SessionRepository {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Check that the backing service is reachable
    async fn health_check(&self) -> RepoResult<()>;

    /// Release the backing connection
    async fn disconnect(&self) -> RepoResult<()>;
}
