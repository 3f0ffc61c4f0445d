//! Per-route middleware chain
//!
//! Every endpoint is wrapped, outermost first, in: method check, JSON
//! content type, authentication (protected routes), CSRF check (routes that
//! need it, when enabled) and panic recovery. A failing stage answers
//! without calling the next one.

use std::any::Any;

use axum::{
    extract::{Request, State},
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
};
use axum_extra::extract::cookie::CookieJar;
use habits_common::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
use habits_service::AuthService;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, warn};

use crate::extractors::{bearer_token, AuthUser};
use crate::response::{attach_access_token, attach_csrf_token, sets_csrf_cookie, ApiError};
use crate::state::AppState;

/// What an endpoint requires of a request
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    protected: bool,
    csrf: bool,
}

impl Endpoint {
    /// Open to anonymous callers
    #[must_use]
    pub fn public(method: Method) -> Self {
        Self {
            method,
            protected: false,
            csrf: false,
        }
    }

    /// Needs a valid access token
    #[must_use]
    pub fn protected(method: Method) -> Self {
        Self {
            method,
            protected: true,
            csrf: false,
        }
    }

    /// Needs a valid access token and, when enabled, a CSRF token
    #[must_use]
    pub fn guarded(method: Method) -> Self {
        Self {
            method,
            protected: true,
            csrf: true,
        }
    }
}

/// Wrap a handler in the middleware chain its endpoint requires
///
/// The route answers every method so that the method check can reply 405
/// with a JSON body.
pub fn endpoint<H, T>(state: &AppState, kind: Endpoint, handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    let mut route = any(handler).layer(CatchPanicLayer::custom(handle_panic));

    if kind.csrf && state.service_context().csrf_protection() {
        route = route.layer(from_fn_with_state(state.clone(), require_csrf));
    }
    if kind.protected {
        route = route.layer(from_fn_with_state(state.clone(), require_auth));
    }

    route
        .layer(from_fn(json_content_type))
        .layer(from_fn_with_state(kind.method, allow_method))
}

async fn allow_method(State(allowed): State<Method>, request: Request, next: Next) -> Response {
    if request.method() != allowed {
        return ApiError::MethodNotAllowed {
            method: request.method().clone(),
            allowed,
        }
        .into_response();
    }

    next.run(request).await
}

async fn json_content_type(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Validate the bearer token and expose the caller to the handler
///
/// The token to keep using, renewed when close to expiry, is returned in the
/// `Authorization` response header.
async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(ApiError::MissingAuth)?;

    let grant = AuthService::new(state.service_context())
        .authorize(&token)
        .await
        .inspect_err(|e| debug!(error = %e, "Authorization rejected"))?;

    request.extensions_mut().insert(AuthUser::from(&grant.claims));

    let mut response = next.run(request).await;
    attach_access_token(response.headers_mut(), &grant.access_token)?;
    Ok(response)
}

/// Check the CSRF header against the cookie and rotate the token on success
async fn require_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let csrf = state.csrf_service();

    {
        let headers = request.headers();
        let jar = CookieJar::from_headers(headers);
        let header_token = headers
            .get(CSRF_HEADER_NAME)
            .and_then(|v| v.to_str().ok());
        let cookie_token = jar.get(CSRF_COOKIE_NAME).map(|c| c.value());

        csrf.validate(header_token, cookie_token)
            .inspect_err(|e| warn!(error = %e, "CSRF check failed"))?;
    }

    let mut response = next.run(request).await;

    if response.status().is_success() && !sets_csrf_cookie(&response) {
        let token = csrf.issue()?;
        attach_csrf_token(response.headers_mut(), &token, csrf.expiry())?;
    }

    Ok(response)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    ApiError::internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
