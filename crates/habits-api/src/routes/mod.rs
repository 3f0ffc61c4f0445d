//! Route definitions
//!
//! API routes are mounted under `/{API_NAME}/{API_VERSION}`; health probes
//! live at the root.

use axum::{http::Method, routing::get, Router};
use habits_common::AppError;

use crate::handlers::{auth, habits, health};
use crate::middleware::{endpoint, Endpoint};
use crate::response::ApiError;
use crate::state::AppState;

/// Create the main router with all routes
///
/// Takes the state because the CSRF stage is only mounted when enabled.
pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest(&state.config().api.base_path(), api_routes(state))
        .merge(health_routes())
        .fallback(unknown_route)
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes(state))
        .merge(habit_routes(state))
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            endpoint(state, Endpoint::public(Method::POST), auth::register),
        )
        .route(
            "/login",
            endpoint(state, Endpoint::public(Method::POST), auth::login),
        )
        .route(
            "/refresh",
            endpoint(state, Endpoint::public(Method::POST), auth::refresh),
        )
        .route(
            "/logout",
            endpoint(state, Endpoint::guarded(Method::POST), auth::logout),
        )
}

/// Habit routes
fn habit_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/createhabit",
            endpoint(state, Endpoint::guarded(Method::POST), habits::create_habit),
        )
        .route(
            "/retrievehabit",
            endpoint(state, Endpoint::protected(Method::GET), habits::retrieve_habit),
        )
        .route(
            "/retrievehabits",
            endpoint(state, Endpoint::protected(Method::GET), habits::retrieve_habits),
        )
        .route(
            "/updatehabit",
            endpoint(state, Endpoint::guarded(Method::PUT), habits::update_habit),
        )
        .route(
            "/updatehabits",
            endpoint(state, Endpoint::guarded(Method::PUT), habits::update_habits),
        )
        .route(
            "/deletehabit",
            endpoint(state, Endpoint::guarded(Method::DELETE), habits::delete_habit),
        )
}

async fn unknown_route() -> ApiError {
    ApiError::App(AppError::not_found("route"))
}
