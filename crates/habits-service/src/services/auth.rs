//! Authentication service
//!
//! Handles registration, login, logout and access token renewal.

use chrono::Utc;
use habits_common::auth::{hash_password, verify_password_or_error, Claims};
use habits_common::AppError;
use habits_core::entities::{NewUser, User, UserSession};
use habits_core::error::DomainError;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    LoginRequest, LoginResponse, LogoutResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Access tokens with at most this many seconds left are renewed in flight
pub const RENEWAL_THRESHOLD_SECS: i64 = 60;

/// Where a login came from, recorded on the session
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub device: String,
    pub ip_address: String,
}

/// A response body together with the credentials to hand back to the client
#[derive(Debug, Clone)]
pub struct Authenticated<T> {
    pub body: T,
    pub access_token: String,
    pub csrf_token: String,
}

/// Outcome of checking a request's access token
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub claims: Claims,
    /// Token to return in the `Authorization` response header
    pub access_token: String,
    pub renewed: bool,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisterResponse> {
        request.validate()?;

        if self.ctx.user_repo().email_exists(&request.email).await? {
            warn!("Registration rejected: email already in use");
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let user = self
            .ctx
            .user_repo()
            .create_user(&NewUser {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        info!(user_id = %user.id, "User registered successfully");

        Ok(RegisterResponse {
            success: true,
            user: UserResponse::from(&user),
        })
    }

    /// Login with email and password
    ///
    /// An existing session of the same user is logged out first.
    #[instrument(skip(self, request, client), fields(email = %request.email))]
    pub async fn login(
        &self,
        request: LoginRequest,
        client: ClientInfo,
    ) -> ServiceResult<Authenticated<LoginResponse>> {
        request.validate()?;

        let user = self
            .ctx
            .user_repo()
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        verify_password_or_error(&request.password, &user.password_hash)
            .inspect_err(|e| warn!(user_id = %user.id, error = %e, "Login failed"))?;

        if self.ctx.session_repo().find_session(&user.id).await?.is_some() {
            info!(user_id = %user.id, "Replacing existing session");
            self.ctx.session_repo().logout(&user.id).await?;
        }

        let token_pair = self.ctx.jwt_service().generate_token_pair(&user.email)?;
        let logged_in_at = Utc::now();

        let session = UserSession {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            refresh_token: token_pair.refresh_token,
            device: client.device,
            ip_address: client.ip_address,
            created_at: logged_in_at,
        };
        self.ctx.session_repo().login(&session).await?;

        let csrf_token = self.ctx.csrf_service().issue()?;

        info!(user_id = %user.id, "User logged in successfully");

        Ok(Authenticated {
            body: LoginResponse {
                success: true,
                user: UserResponse::from(&user),
                logged_in_at,
            },
            access_token: token_pair.access_token,
            csrf_token,
        })
    }

    /// End the caller's session
    #[instrument(skip(self))]
    pub async fn logout(&self, email: &str) -> ServiceResult<LogoutResponse> {
        let user = self.find_user(email).await?;

        self.ctx.session_repo().logout(&user.id).await?;

        info!(user_id = %user.id, "User logged out successfully");

        Ok(LogoutResponse {
            success: true,
            email_address: user.email,
            logged_out_at: Utc::now(),
        })
    }

    /// Issue a new access token from the caller's stored session
    ///
    /// `bearer` must carry a valid signature and name the requested email;
    /// its expiry is not checked.
    #[instrument(skip(self, request, bearer), fields(email = %request.email))]
    pub async fn refresh(
        &self,
        request: RefreshRequest,
        bearer: &str,
    ) -> ServiceResult<Authenticated<RefreshResponse>> {
        request.validate()?;

        let claims = self.ctx.jwt_service().decode_token_ignoring_expiry(bearer)?;
        if claims.email() != request.email {
            warn!("Refresh rejected: bearer subject does not match");
            return Err(AppError::InvalidToken.into());
        }

        let access_token = self.renew_access_token(&request.email).await?;
        let csrf_token = self.ctx.csrf_service().issue()?;

        info!("Access token refreshed");

        Ok(Authenticated {
            body: RefreshResponse {
                success: true,
                email_address: request.email,
            },
            access_token,
            csrf_token,
        })
    }

    /// Validate an access token, renewing it when it is about to expire
    ///
    /// # Errors
    /// `InvalidToken`/`TokenExpired` for a bad or expired token, and
    /// `SessionNotFound` when renewal is due but the user has no session.
    #[instrument(skip(self, token))]
    pub async fn authorize(&self, token: &str) -> ServiceResult<AccessGrant> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;

        if claims.seconds_remaining() > RENEWAL_THRESHOLD_SECS {
            return Ok(AccessGrant {
                claims,
                access_token: token.to_string(),
                renewed: false,
            });
        }

        debug!(email = %claims.email(), "Access token close to expiry, renewing");
        let access_token = self.renew_access_token(claims.email()).await?;

        Ok(AccessGrant {
            claims,
            access_token,
            renewed: true,
        })
    }

    /// Mint an access token backed by the user's persisted refresh token
    async fn renew_access_token(&self, email: &str) -> ServiceResult<String> {
        let user = self
            .ctx
            .user_repo()
            .find_user_by_email(email)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        let session = self
            .ctx
            .session_repo()
            .find_session(&user.id)
            .await?
            .ok_or_else(|| DomainError::SessionNotFound(user.id.clone()))?;

        let jwt = self.ctx.jwt_service();
        let claims = jwt.validate_refresh_token(&session.refresh_token)?;
        if claims.email() != user.email {
            return Err(AppError::InvalidToken.into());
        }

        Ok(jwt.generate_token_pair(&user.email)?.access_token)
    }

    async fn find_user(&self, email: &str) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.to_string()).into())
    }
}
