//! CSRF token service
//!
//! Tokens are short-lived HS256-signed values carrying a random nonce. The
//! same token is handed out in a `csrf_token` cookie and an `X-CSRF-Token`
//! header; a state-changing request must echo the header and carry the
//! matching cookie (double submit).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Cookie carrying the CSRF token
pub const CSRF_COOKIE_NAME: &str = "csrf_token";

/// Request/response header carrying the CSRF token
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

const NONCE_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct CsrfClaims {
    nonce: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates CSRF tokens
#[derive(Clone)]
pub struct CsrfService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: i64,
}

impl CsrfService {
    #[must_use]
    pub fn new(secret: &str, expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    /// Token lifetime in seconds
    #[must_use]
    pub fn expiry(&self) -> i64 {
        self.expiry
    }

    /// Issue a new signed token
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self) -> Result<String, AppError> {
        let nonce_bytes: [u8; NONCE_BYTES] = rand::random();
        let now = Utc::now();

        let claims = CsrfClaims {
            nonce: URL_SAFE_NO_PAD.encode(nonce_bytes),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.expiry)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode CSRF token")))
    }

    /// Check a token's signature, algorithm and expiry
    ///
    /// # Errors
    /// Returns `AppError::CsrfRejected` on any failure
    pub fn verify(&self, token: &str) -> Result<(), AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<CsrfClaims>(token, &self.decoding_key, &validation)
            .map(|_| ())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::CsrfRejected("token expired")
                }
                _ => AppError::CsrfRejected("invalid token"),
            })
    }

    /// Validate a request's header token against its cookie token
    ///
    /// # Errors
    /// Returns `AppError::CsrfRejected` if either token is missing, they differ,
    /// or the token fails verification
    pub fn validate(&self, header: Option<&str>, cookie: Option<&str>) -> Result<(), AppError> {
        let header = header
            .filter(|t| !t.is_empty())
            .ok_or(AppError::CsrfRejected("missing header token"))?;
        let cookie = cookie
            .filter(|t| !t.is_empty())
            .ok_or(AppError::CsrfRejected("missing cookie token"))?;

        if !constant_time_eq(header.as_bytes(), cookie.as_bytes()) {
            return Err(AppError::CsrfRejected("token mismatch"));
        }

        self.verify(header)
    }
}

impl std::fmt::Debug for CsrfService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfService")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
