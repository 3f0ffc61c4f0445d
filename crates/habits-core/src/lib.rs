//! # habits-core
//!
//! Domain layer containing entities, validation rules, and the store traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use entities::{Habit, HabitChanges, NewHabit, NewUser, User, UserSession};
pub use error::DomainError;
pub use traits::{HabitRepository, RepoResult, SessionRepository, Store, UserRepository};
pub use validation::{
    is_valid_email, is_valid_name, is_valid_password, validate_habit, HabitFields,
};
