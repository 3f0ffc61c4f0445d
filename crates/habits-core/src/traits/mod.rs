//! Store traits implemented by the persistence layer

mod repositories;

pub use repositories::{HabitRepository, RepoResult, SessionRepository, Store, UserRepository};
