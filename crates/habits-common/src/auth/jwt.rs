//! JWT utilities for authentication
//!
//! Access and refresh tokens are HS256-signed claims whose subject is the
//! user's email address.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

impl Claims {
    /// Email address of the token's owner
    #[must_use]
    pub fn email(&self) -> &str {
        &self.sub
    }

    /// Seconds left before expiry (negative once expired)
    #[must_use]
    pub fn seconds_remaining(&self) -> i64 {
        self.exp - Utc::now().timestamp()
    }
}

/// Tokens issued together at login
///
/// Only the refresh token is persisted, on the user's session.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry times (seconds)
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64, refresh_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Generate a short-lived access token
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_access_token(&self, email: &str) -> Result<String, AppError> {
        self.encode_token(email, TokenType::Access)
    }

    /// Generate a long-lived refresh token
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_refresh_token(&self, email: &str) -> Result<String, AppError> {
        self.encode_token(email, TokenType::Refresh)
    }

    /// Generate a token pair for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_token_pair(&self, email: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(email)?,
            refresh_token: self.generate_refresh_token(email)?,
        })
    }

    /// Encode a JWT token
    fn encode_token(&self, email: &str, token_type: TokenType) -> Result<String, AppError> {
        let now = Utc::now();
        let expiry = match token_type {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
        };

        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    fn validation(check_expiry: bool) -> Validation {
        // Only HS256 is accepted; any other alg in the header fails decoding
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;
        if !check_expiry {
            validation.required_spec_claims.remove("exp");
        }
        validation
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_with(token, &Self::validation(true))
    }

    /// Decode a token checking only its signature
    ///
    /// Used to identify the caller of the refresh endpoint, whose access token
    /// has usually expired already.
    ///
    /// # Errors
    /// Returns an error if the signature or structure is invalid
    pub fn decode_token_ignoring_expiry(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_with(token, &Self::validation(false))
    }

    /// Validate an access token and return the claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_kind(token, TokenType::Access)
    }

    /// Validate a refresh token and return the claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_kind(token, TokenType::Refresh)
    }

    fn validate_kind(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.token_type != expected {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish_non_exhaustive()
    }
}
