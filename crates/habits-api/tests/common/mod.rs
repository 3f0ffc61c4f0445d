#![allow(dead_code)]

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use habits_common::{AppConfig, CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use habits_api::{create_app, create_app_state, AppState};

pub const BASE: &str = "/habits/v1";
pub const DEMO_EMAIL: &str = "johndoe1@example.com";

/// Development configuration: seeded in-memory store, CSRF as requested.
pub fn test_config(csrf_protection: bool) -> AppConfig {
    let vars: HashMap<&str, String> = [
        ("ENVIRONMENT", "development".to_string()),
        ("PORT", "0".to_string()),
        ("API_NAME", "habits".to_string()),
        ("API_VERSION", "v1".to_string()),
        ("APP_VERSION", "0.1.0-test".to_string()),
        ("LOG_VERBOSITY", "0".to_string()),
        ("JWT_SECRET", "api-test-secret".to_string()),
        ("DB_URL", "mongodb://localhost:27017".to_string()),
        ("DB_NAME", "habits_test".to_string()),
        ("USERS_COLLECTION", "users".to_string()),
        ("USER_SESSION_COLLECTION", "sessions".to_string()),
        ("HABITS_COLLECTION", "habits".to_string()),
        ("CSRF_PROTECTION", csrf_protection.to_string()),
    ]
    .into_iter()
    .collect();

    AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Build the full application router the way `run` does.
pub async fn build_test_app(csrf_protection: bool) -> (Router, AppState) {
    let state = create_app_state(test_config(csrf_protection)).await.unwrap();
    (create_app(state.clone()), state)
}

/// Credentials returned by a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub csrf_token: String,
}

/// Request builder carrying a session's credentials.
pub fn request(
    method: Method,
    path: &str,
    session: Option<&Session>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("{BASE}{path}"));

    if let Some(session) = session {
        builder = builder
            .header(header::AUTHORIZATION, format!("Bearer {}", session.access_token))
            .header(CSRF_HEADER_NAME, session.csrf_token.as_str())
            .header(
                header::COOKIE,
                format!("{CSRF_COOKIE_NAME}={}", session.csrf_token),
            );
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in and collect the credentials from the response headers.
pub async fn login(app: &Router, email: &str, password: &str) -> Session {
    let response = send(
        app,
        request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "EmailAddress": email, "Password": password })),
        ),
    )
    .await;
    assert!(response.status().is_success(), "login failed: {}", response.status());

    let headers = response.headers();
    let access_token = headers[header::AUTHORIZATION]
        .to_str()
        .unwrap()
        .trim_start_matches("Bearer ")
        .to_string();
    let csrf_token = headers[CSRF_HEADER_NAME].to_str().unwrap().to_string();

    Session {
        access_token,
        csrf_token,
    }
}

pub async fn login_demo(app: &Router) -> Session {
    login(app, DEMO_EMAIL, habits_db::DEMO_PASSWORD).await
}
