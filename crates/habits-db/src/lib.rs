//! # habits-db
//!
//! Store layer implementing the repository traits from `habits-core`.
//!
//! ## Overview
//!
//! Two interchangeable stores are provided:
//!
//! - [`MemoryStore`]: process-local state behind one lock, optionally seeded
//!   with demo users and habits
//! - [`MongoStore`]: MongoDB collections for users, sessions and habits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use habits_db::MongoStore;
//! use habits_core::traits::HabitRepository;
//!
//! async fn example(config: &habits_common::DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoStore::connect(config).await?;
//!     let habits = store.find_habits("6716f0c2a1b2c3d4e5f60718").await?;
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod mongo;

// Re-export commonly used types
pub use memory::{MemoryStore, DEMO_PASSWORD};
pub use mongo::MongoStore;
