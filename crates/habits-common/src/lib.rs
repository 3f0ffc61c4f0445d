//! # habits-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, verify_password, verify_password_or_error, Claims, CsrfService, JwtService,
    TokenPair, TokenType, CSRF_COOKIE_NAME, CSRF_HEADER_NAME,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    SecurityConfig, ServerConfig, StoreBackend,
};
pub use error::{AppError, ErrorResponse};
pub use telemetry::{try_init_tracing_with_config, TracingConfig, TracingError};
