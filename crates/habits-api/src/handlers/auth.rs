//! Authentication handlers
//!
//! Endpoints for user registration, login, logout, and token refresh.

use axum::{extract::State, Json};
use habits_service::dto::{
    LoginRequest, LoginResponse, LogoutResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse,
};
use habits_service::{AuthService, Authenticated};

use crate::extractors::{AuthUser, BearerToken, ClientMeta, JsonBody};
use crate::response::{ApiResult, ClearCsrfCookie, Created, IssuedTokens};
use crate::state::AppState;

fn issued<T>(state: &AppState, authenticated: Authenticated<T>) -> (IssuedTokens, Json<T>) {
    let tokens = IssuedTokens {
        access_token: authenticated.access_token,
        csrf_token: authenticated.csrf_token,
        csrf_max_age: state.csrf_service().expiry(),
    };
    (tokens, Json(authenticated.body))
}

/// Register a new user
///
/// POST /register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<Created<Json<RegisterResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<(IssuedTokens, Json<LoginResponse>)> {
    let service = AuthService::new(state.service_context());
    let authenticated = service.login(request, client).await?;
    Ok(issued(&state, authenticated))
}

/// Issue a new access token from the stored session
///
/// POST /refresh
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(bearer): BearerToken,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> ApiResult<(IssuedTokens, Json<RefreshResponse>)> {
    let service = AuthService::new(state.service_context());
    let authenticated = service.refresh(request, &bearer).await?;
    Ok(issued(&state, authenticated))
}

/// Logout the caller
///
/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<(ClearCsrfCookie, Json<LogoutResponse>)> {
    let service = AuthService::new(state.service_context());
    let response = service.logout(&auth.email).await?;
    Ok((ClearCsrfCookie, Json(response)))
}
