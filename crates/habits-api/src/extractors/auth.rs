//! Authentication extractors
//!
//! `AuthUser` reads the caller placed in the request extensions by the auth
//! middleware; `BearerToken` reads the raw token from the Authorization header.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use habits_common::Claims;

use crate::response::ApiError;

/// Bearer token from an Authorization header, if well formed
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Email address from the access token
    pub email: String,
}

impl From<&Claims> for AuthUser {
    fn from(claims: &Claims) -> Self {
        Self {
            email: claims.email().to_string(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::MissingAuth)
    }
}

/// Raw bearer token, validated by the handler that takes it
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(BearerToken)
            .ok_or(ApiError::MissingAuth)
    }
}
