//! MongoDB store

mod client;
mod documents;
mod error;
mod habits;
mod sessions;
mod users;

pub use client::MongoStore;
