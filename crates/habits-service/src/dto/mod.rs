//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs for auth and habit inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    BulkHabitUpdate, CreateHabitRequest, LoginRequest, RefreshRequest, RegisterRequest,
    UpdateHabitRequest,
};

pub use responses::{
    CreatedHabitResponse, DeleteHabitResponse, HabitResponse, HealthChecks, HealthResponse,
    LoginResponse, LogoutResponse, ReadinessResponse, RefreshResponse, RegisterResponse,
    UserResponse,
};
