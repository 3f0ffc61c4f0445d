//! Test helpers for integration tests
//!
//! Provides a server running on an ephemeral port, a client that carries the
//! bearer and CSRF credentials between requests, and response assertions.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use habits_api::{create_app, create_app_state, serve};
use habits_common::{AppConfig, CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Credentials handed out by login and refresh
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub csrf_token: Option<String>,
}

impl Credentials {
    /// Read credentials from a login or refresh response
    pub fn from_response(response: &Response) -> Option<Self> {
        let access_token = bearer_from(response)?;
        Some(Self {
            access_token,
            csrf_token: header_str(response, CSRF_HEADER_NAME),
        })
    }

    /// Pick up a renewed access token or a rotated CSRF token
    pub fn update(&mut self, response: &Response) {
        if let Some(token) = bearer_from(response) {
            self.access_token = token;
        }
        if let Some(token) = header_str(response, CSRF_HEADER_NAME) {
            self.csrf_token = Some(token);
        }
    }
}

fn header_str(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn bearer_from(response: &Response) -> Option<String> {
    header_str(response, header::AUTHORIZATION.as_str())
        .and_then(|v| v.strip_prefix("Bearer ").map(String::from))
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    base_path: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the seeded in-memory store with CSRF disabled
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(false)).await
    }

    /// Start a server on the seeded in-memory store with CSRF enabled
    pub async fn start_with_csrf() -> Result<Self> {
        Self::start_with_config(test_config(true)).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let base_path = config.api.base_path();

        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app, std::future::pending()).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            base_path,
            handle,
        })
    }

    /// Server root URL
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of an API route
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url(), self.base_path, path)
    }

    /// GET a path relative to the server root
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Send an API request with optional credentials and JSON body
    ///
    /// Credentials travel as a bearer token, plus the CSRF token as both
    /// header and cookie when one is held.
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        credentials: Option<&Credentials>,
        body: Option<&T>,
    ) -> Result<Response> {
        let mut request = self.client.request(method, self.api_url(path));

        if let Some(credentials) = credentials {
            request = request.bearer_auth(&credentials.access_token);
            if let Some(csrf) = &credentials.csrf_token {
                request = request
                    .header(CSRF_HEADER_NAME, csrf)
                    .header(header::COOKIE, format!("{CSRF_COOKIE_NAME}={csrf}"));
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// POST a JSON body without credentials
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        self.send(Method::POST, path, None, Some(body)).await
    }

    /// Send with credentials and fold renewed tokens back into them
    pub async fn send_auth<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        credentials: &mut Credentials,
        body: Option<&T>,
    ) -> Result<Response> {
        let response = self.send(method, path, Some(&*credentials), body).await?;
        credentials.update(&response);
        Ok(response)
    }

    /// Log in and return the issued credentials
    pub async fn login(&self, email: &str, password: &str) -> Result<Credentials> {
        let response = self
            .post("/login", &crate::fixtures::LoginRequest::new(email, password))
            .await?;
        let credentials = Credentials::from_response(&response);
        assert_status(response, StatusCode::OK).await?;
        credentials.ok_or_else(|| anyhow::anyhow!("login response carried no bearer token"))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Development configuration over the seeded in-memory store
pub fn test_config(csrf_protection: bool) -> AppConfig {
    let vars: HashMap<&str, String> = [
        ("ENVIRONMENT", "development".to_string()),
        ("HOST", "127.0.0.1".to_string()),
        ("PORT", "0".to_string()),
        ("API_NAME", "habits".to_string()),
        ("API_VERSION", "v1".to_string()),
        ("APP_VERSION", "0.1.0".to_string()),
        ("LOG_VERBOSITY", "0".to_string()),
        ("JWT_SECRET", "integration-test-secret".to_string()),
        ("DB_URL", "mongodb://localhost:27017".to_string()),
        ("DB_NAME", "habits_test".to_string()),
        ("USERS_COLLECTION", "users".to_string()),
        ("USER_SESSION_COLLECTION", "sessions".to_string()),
        ("HABITS_COLLECTION", "habits".to_string()),
        ("CSRF_PROTECTION", csrf_protection.to_string()),
    ]
    .into_iter()
    .collect();

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .unwrap_or_else(|e| panic!("test configuration is invalid: {e}"))
}

/// Configuration from the environment, when a MongoDB instance is available
pub fn mongo_config() -> Option<AppConfig> {
    if std::env::var("DB_URL").is_err() {
        eprintln!("Skipping test: DB_URL not set");
        return None;
    }

    match AppConfig::from_env() {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Skipping test: {e}");
            None
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
