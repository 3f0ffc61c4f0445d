//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod habits;
pub mod health;
