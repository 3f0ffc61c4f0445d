//! Business logic services
//!
//! Auth and habit services built on a shared `ServiceContext`.

pub mod auth;
pub mod context;
pub mod error;
pub mod habits;

pub use auth::{AccessGrant, AuthService, Authenticated, ClientInfo, RENEWAL_THRESHOLD_SECS};
pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use habits::HabitService;
