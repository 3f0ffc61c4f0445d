//! Axum extractors for request handling
//!
//! Custom extractors for the authenticated caller, JSON bodies, the habit id
//! query parameter and client metadata.

mod auth;
mod client;
mod json;
mod query;

pub use auth::{bearer_token, AuthUser, BearerToken};
pub use client::ClientMeta;
pub use json::JsonBody;
pub use query::HabitId;
