//! In-memory store used in development and tests

mod seed;
mod store;

pub use seed::DEMO_PASSWORD;
pub use store::MemoryStore;
