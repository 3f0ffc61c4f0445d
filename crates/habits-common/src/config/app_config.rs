//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::str::FromStr;

use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub env: Environment,
    /// Application version reported by the health endpoint
    pub version: String,
    /// 0 = errors only, 1 = info, 2 = debug, 3+ = trace
    pub log_verbosity: u8,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "staging" | "stage" => Ok(Self::Staging),
            "prod" | "production" => Ok(Self::Production),
            other => Err(other.to_string()),
        }
    }
}

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Seeded in-memory store
    Memory,
    /// MongoDB
    Mongo,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// First path segment of every API route
    pub name: String,
    /// Second path segment of every API route
    pub version: String,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Route prefix, e.g. `/habits/v1`
    #[must_use]
    pub fn base_path(&self) -> String {
        format!("/{}/{}", self.name, self.version)
    }
}

/// Document database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub users_collection: String,
    pub sessions_collection: String,
    pub habits_collection: String,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// CSRF protection settings
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub csrf_protection: bool,
    #[serde(default = "default_csrf_token_expiry")]
    pub csrf_token_expiry: i64,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_access_token_expiry() -> i64 {
    300 // 5 minutes
}

fn default_refresh_token_expiry() -> i64 {
    86400 // 24 hours
}

fn default_csrf_token_expiry() -> i64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required environment variable is missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Self {
            app: AppSettings {
                env: vars.parse("ENVIRONMENT")?,
                version: vars.required("APP_VERSION")?,
                log_verbosity: vars.parse("LOG_VERBOSITY")?,
            },
            api: ServerConfig {
                host: vars.optional("HOST").unwrap_or_else(default_host),
                port: vars.parse("PORT")?,
                name: vars.required("API_NAME")?,
                version: vars.required("API_VERSION")?,
            },
            database: DatabaseConfig {
                url: vars.required("DB_URL")?,
                name: vars.required("DB_NAME")?,
                users_collection: vars.required("USERS_COLLECTION")?,
                sessions_collection: vars.required("USER_SESSION_COLLECTION")?,
                habits_collection: vars.required("HABITS_COLLECTION")?,
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                access_token_expiry: vars
                    .parse_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
                refresh_token_expiry: vars
                    .parse_or("JWT_REFRESH_TOKEN_EXPIRY", default_refresh_token_expiry)?,
            },
            security: SecurityConfig {
                csrf_protection: vars.parse_or("CSRF_PROTECTION", || false)?,
                csrf_token_expiry: vars.parse_or("CSRF_TOKEN_EXPIRY", default_csrf_token_expiry)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .optional("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }

    /// Store selected by the environment: development runs on the in-memory store
    #[must_use]
    pub fn store_backend(&self) -> StoreBackend {
        if self.app.env.is_development() {
            StoreBackend::Memory
        } else {
            StoreBackend::Mongo
        }
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.required(key)?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw))
    }

    fn parse_or<T: FromStr>(
        &self,
        key: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
