//! # habits-service
//!
//! Application layer containing the auth and habit services, and the DTOs
//! that make up the JSON view.

pub mod dto;
pub mod services;

pub use services::{
    AccessGrant, AuthService, Authenticated, ClientInfo, HabitService, ServiceContext, ServiceError,
    ServiceResult,
};
