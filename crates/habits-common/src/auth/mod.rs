//! Authentication utilities

mod csrf;
mod jwt;
mod password;

pub use csrf::{CsrfService, CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use password::{hash_password, verify_password, verify_password_or_error};
