//! API Integration Tests
//!
//! Each test starts a server on an ephemeral port backed by the seeded
//! in-memory store. The MongoDB test additionally requires `DB_URL` and the
//! rest of the server environment to be set.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use habits_db::DEMO_PASSWORD;
use integration_tests::{
    assert_json, assert_status, fixtures::*, mongo_config, Credentials, TestServer,
};
use reqwest::{header, Method, StatusCode};
use serde_json::Value;

const DEMO_EMAIL: &str = "johndoe1@example.com";

const NO_BODY: Option<&()> = None;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");

    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "0.1.0");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/register", &request).await.unwrap();
    let registered: RegisterResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert!(registered.success);
    assert_eq!(registered.user.email_address, request.email);
    assert_eq!(registered.user.first_name, "Test");
    assert_eq!(registered.user.last_name, "User");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/register", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_weak_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest {
        password: "short".to_string(),
        ..RegisterRequest::unique()
    };

    let response = server.post("/register", &request).await.unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!error.error.message.is_empty());
}

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.expect("Failed to start server");

    let register_req = RegisterRequest::unique();
    let response = server.post("/register", &register_req).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post("/login", &LoginRequest::from_register(&register_req))
        .await
        .unwrap();
    let credentials = Credentials::from_response(&response).expect("credentials");
    assert!(credentials.csrf_token.is_some());

    let login: LoginResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(login.success);
    assert_eq!(login.user.email_address, register_req.email);
}

#[tokio::test]
async fn test_login_invalid_password() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/login", &LoginRequest::new(DEMO_EMAIL, "WrongPass123!"))
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/login", &LoginRequest::new("nobody@example.com", "TestPass123!"))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_refresh_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let credentials = server.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    let request = RefreshRequest {
        email: DEMO_EMAIL.to_string(),
    };
    let response = server
        .send(Method::POST, "/refresh", Some(&credentials), Some(&request))
        .await
        .unwrap();
    let refreshed = Credentials::from_response(&response).expect("credentials");
    assert_status(response, StatusCode::OK).await.unwrap();

    // The refreshed token authorizes habit reads
    let response = server
        .send(Method::GET, "/retrievehabits", Some(&refreshed), NO_BODY)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_logout() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut credentials = server.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    let response = server
        .send_auth(Method::POST, "/logout", &mut credentials, NO_BODY)
        .await
        .unwrap();
    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with("csrf_token=;") && v.contains("Max-Age=0"));
    assert!(cleared, "logout must expire the CSRF cookie");

    let logout: LogoutResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(logout.success);
    assert_eq!(logout.email_address, DEMO_EMAIL);

    // Refresh has no session to draw on any more
    let request = RefreshRequest {
        email: DEMO_EMAIL.to_string(),
    };
    let response = server
        .send(Method::POST, "/refresh", Some(&credentials), Some(&request))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_access() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .send(Method::GET, "/retrievehabits", None, NO_BODY)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_invalid_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let credentials = Credentials {
        access_token: "invalid_token".to_string(),
        csrf_token: None,
    };

    let response = server
        .send(Method::GET, "/retrievehabits", Some(&credentials), NO_BODY)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Habit Tests
// ============================================================================

#[tokio::test]
async fn test_habit_lifecycle() {
    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::unique();
    let response = server.post("/register", &register_req).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
    let mut credentials = server
        .login(&register_req.email, &register_req.password)
        .await
        .unwrap();

    // Nothing yet
    let response = server
        .send_auth(Method::GET, "/retrievehabits", &mut credentials, NO_BODY)
        .await
        .unwrap();
    let habits: Vec<HabitResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(habits.is_empty());

    // Create
    let response = server
        .send_auth(
            Method::POST,
            "/createhabit",
            &mut credentials,
            Some(&CreateHabitRequest::new("Read Daily", 5, 30)),
        )
        .await
        .unwrap();
    let created: CreatedHabitResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(created.name, "Read Daily");
    assert!(created.completion_dates.is_empty());
    let id = created.habit_id;

    // Rename only
    let update = UpdateHabitRequest {
        name: Some("Read Weekly".to_string()),
        ..Default::default()
    };
    let response = server
        .send_auth(
            Method::PUT,
            &format!("/updatehabit?id={id}"),
            &mut credentials,
            Some(&update),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .send_auth(
            Method::GET,
            &format!("/retrievehabit?id={id}"),
            &mut credentials,
            NO_BODY,
        )
        .await
        .unwrap();
    let stored: HabitResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stored.habit_id, id);
    assert_eq!(stored.name, "Read Weekly");
    assert_eq!(stored.days, 5);
    assert_eq!(stored.days_target, 30);

    // Bulk update
    let updates = vec![BulkHabitUpdate {
        habit_id: id.clone(),
        changes: UpdateHabitRequest {
            days: Some(6),
            completion_dates: Some(vec!["2024-12-21".to_string()]),
            ..Default::default()
        },
    }];
    let response = server
        .send_auth(Method::PUT, "/updatehabits", &mut credentials, Some(&updates))
        .await
        .unwrap();
    let updated: Vec<HabitResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].days, 6);
    assert_eq!(updated[0].completion_dates, vec!["2024-12-21"]);

    // Delete, then delete again
    let response = server
        .send_auth(
            Method::DELETE,
            &format!("/deletehabit?id={id}"),
            &mut credentials,
            NO_BODY,
        )
        .await
        .unwrap();
    let deleted: DeleteHabitResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(deleted.success);

    let response = server
        .send_auth(
            Method::DELETE,
            &format!("/deletehabit?id={id}"),
            &mut credentials,
            NO_BODY,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_habits_are_scoped_to_owner() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut credentials = server.login("janesmith@example.com", DEMO_PASSWORD).await.unwrap();

    // Habit 1 belongs to johndoe1
    let response = server
        .send_auth(Method::GET, "/retrievehabit?id=1", &mut credentials, NO_BODY)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .send_auth(Method::GET, "/retrievehabits", &mut credentials, NO_BODY)
        .await
        .unwrap();
    let habits: Vec<HabitResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(habits.iter().all(|h| h.user_id == "2"));
    assert_eq!(habits.len(), 1);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .send(Method::GET, "/register", None, NO_BODY)
        .await
        .unwrap();
    assert_eq!(response.headers()[header::ALLOW], "POST");
    assert_status(response, StatusCode::METHOD_NOT_ALLOWED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_creates_all_land() {
    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::unique();
    let response = server.post("/register", &register_req).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
    let credentials = server
        .login(&register_req.email, &register_req.password)
        .await
        .unwrap();

    let creates = (0..8).map(|i| {
        let request = CreateHabitRequest::new(format!("Habit {i}"), 0, 10);
        let server = &server;
        let credentials = &credentials;
        async move {
            server
                .send(Method::POST, "/createhabit", Some(credentials), Some(&request))
                .await
        }
    });

    for response in join_all(creates).await {
        assert_status(response.unwrap(), StatusCode::OK).await.unwrap();
    }

    let response = server
        .send(Method::GET, "/retrievehabits", Some(&credentials), NO_BODY)
        .await
        .unwrap();
    let habits: Vec<HabitResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(habits.len(), 8);

    let mut ids: Vec<_> = habits.iter().map(|h| h.habit_id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

// ============================================================================
// CSRF Tests
// ============================================================================

#[tokio::test]
async fn test_csrf_rotation_chain() {
    let server = TestServer::start_with_csrf()
        .await
        .expect("Failed to start server");
    let mut credentials = server.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    let first_csrf = credentials.csrf_token.clone();

    let response = server
        .send_auth(
            Method::POST,
            "/createhabit",
            &mut credentials,
            Some(&CreateHabitRequest::new("Stretch", 0, 14)),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    assert_ne!(credentials.csrf_token, first_csrf);

    // The rotated token is accepted for the next write
    let response = server
        .send_auth(
            Method::DELETE,
            "/deletehabit?id=1",
            &mut credentials,
            NO_BODY,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Writes without a token are refused
    let bare = Credentials {
        csrf_token: None,
        ..credentials.clone()
    };
    let response = server
        .send(Method::DELETE, "/deletehabit?id=2", Some(&bare), NO_BODY)
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error.error.code, "CSRF_REJECTED");
}

// ============================================================================
// MongoDB
// ============================================================================

#[tokio::test]
async fn test_mongo_backed_flow() {
    let Some(config) = mongo_config() else {
        return;
    };
    if config.app.env.is_development() {
        eprintln!("Skipping test: ENVIRONMENT selects the in-memory store");
        return;
    }

    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let register_req = RegisterRequest::unique();
    let response = server.post("/register", &register_req).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let mut credentials = server
        .login(&register_req.email, &register_req.password)
        .await
        .unwrap();

    let response = server
        .send_auth(
            Method::POST,
            "/createhabit",
            &mut credentials,
            Some(&CreateHabitRequest::new("Walk", 1, 20)),
        )
        .await
        .unwrap();
    let created: CreatedHabitResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .send_auth(
            Method::DELETE,
            &format!("/deletehabit?id={}", created.habit_id),
            &mut credentials,
            NO_BODY,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .send_auth(Method::POST, "/logout", &mut credentials, NO_BODY)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}
