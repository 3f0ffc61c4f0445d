//! Response types and error handling for API endpoints
//!
//! Provides unified error handling, JSON response formatting and the
//! headers that carry tokens back to the client.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, IntoResponseParts, Response, ResponseParts},
    Json,
};
use habits_common::{AppError, ErrorResponse, CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
use habits_core::DomainError;
use habits_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    #[error("Missing or empty `id` query parameter")]
    MissingId,

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: Method, allowed: Method },

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Domain(e) => e.status_code(),
            Self::MalformedBody(_) | Self::InvalidQuery(_) | Self::MissingId => 400,
            Self::MissingAuth => 401,
            Self::MethodNotAllowed { .. } => 405,
            Self::Internal(_) => 500,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Domain(e) => e.code(),
            Self::MalformedBody(_) => "MALFORMED_BODY",
            Self::InvalidQuery(_) => "INVALID_QUERY_PARAMETER",
            Self::MissingId => "MISSING_ID",
            Self::MissingAuth => "MISSING_AUTHORIZATION",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// Create an invalid query error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server errors are logged in full and reported generically
        let message = if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorResponse {
                code: self.error_code().to_string(),
                message,
                details: None,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Self::MethodNotAllowed { allowed, .. } = &self {
            if let Ok(value) = HeaderValue::from_str(allowed.as_str()) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Created response (201) with JSON body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}

// ============================================================================
// Credential headers
// ============================================================================

/// `Set-Cookie` value carrying a CSRF token
pub fn csrf_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{CSRF_COOKIE_NAME}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; Secure; SameSite=Strict"
    )
}

/// `Set-Cookie` value that expires the CSRF cookie
pub fn expired_csrf_cookie() -> String {
    csrf_cookie("", 0)
}

/// Whether a response already sets or clears the CSRF cookie
pub fn sets_csrf_cookie(response: &Response) -> bool {
    let prefix = format!("{CSRF_COOKIE_NAME}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|value| value.to_str().is_ok_and(|v| v.starts_with(&prefix)))
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(ApiError::internal)
}

/// Attach a fresh CSRF token as both cookie and header
pub fn attach_csrf_token(
    headers: &mut axum::http::HeaderMap,
    token: &str,
    max_age_secs: i64,
) -> Result<(), ApiError> {
    headers.append(header::SET_COOKIE, header_value(&csrf_cookie(token, max_age_secs))?);
    headers.insert(CSRF_HEADER_NAME, header_value(token)?);
    Ok(())
}

/// Attach an access token as `Authorization: Bearer <token>`
pub fn attach_access_token(
    headers: &mut axum::http::HeaderMap,
    token: &str,
) -> Result<(), ApiError> {
    headers.insert(header::AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
    Ok(())
}

/// Tokens handed to the client after login or refresh
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub csrf_token: String,
    pub csrf_max_age: i64,
}

impl IntoResponseParts for IssuedTokens {
    type Error = ApiError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        attach_access_token(res.headers_mut(), &self.access_token)?;
        attach_csrf_token(res.headers_mut(), &self.csrf_token, self.csrf_max_age)?;
        Ok(res)
    }
}

/// Expires the CSRF cookie
#[derive(Debug, Clone, Copy)]
pub struct ClearCsrfCookie;

impl IntoResponseParts for ClearCsrfCookie {
    type Error = ApiError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut()
            .append(header::SET_COOKIE, header_value(&expired_csrf_cookie())?);
        Ok(res)
    }
}
