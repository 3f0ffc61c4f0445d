//! Service context - dependency container for services
//!
//! Holds the store, the token services and the habit gate.

use std::sync::Arc;

use habits_common::auth::{CsrfService, JwtService};
use habits_common::AppConfig;
use habits_core::traits::{HabitRepository, SessionRepository, Store, UserRepository};
use tokio::sync::Mutex;

/// Service context containing all dependencies
///
/// Cheap to clone: every field is shared. Clones share the same habit gate,
/// so habit operations stay serialized across all handlers.
#[derive(Clone)]
pub struct ServiceContext {
    // Store, viewed through each repository trait
    store: Arc<dyn Store>,
    habit_repo: Arc<dyn HabitRepository>,
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,

    // Token services
    jwt_service: Arc<JwtService>,
    csrf_service: Arc<CsrfService>,
    csrf_protection: bool,

    // At most one habit operation runs at a time
    habit_gate: Arc<Mutex<()>>,
}

impl ServiceContext {
    /// Create a context around one store
    pub fn new<S>(
        store: Arc<S>,
        jwt_service: Arc<JwtService>,
        csrf_service: Arc<CsrfService>,
        csrf_protection: bool,
    ) -> Self
    where
        S: Store + 'static,
    {
        Self {
            habit_repo: store.clone(),
            user_repo: store.clone(),
            session_repo: store.clone(),
            store,
            jwt_service,
            csrf_service,
            csrf_protection,
            habit_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create a context with token services configured from `config`
    pub fn from_config<S>(store: Arc<S>, config: &AppConfig) -> Self
    where
        S: Store + 'static,
    {
        Self::new(
            store,
            Arc::new(JwtService::new(
                &config.jwt.secret,
                config.jwt.access_token_expiry,
                config.jwt.refresh_token_expiry,
            )),
            Arc::new(CsrfService::new(
                &config.jwt.secret,
                config.security.csrf_token_expiry,
            )),
            config.security.csrf_protection,
        )
    }

    // === Store ===

    /// Get the whole store
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Get the habit repository
    pub fn habit_repo(&self) -> &dyn HabitRepository {
        self.habit_repo.as_ref()
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the session repository
    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.session_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the CSRF token service
    pub fn csrf_service(&self) -> &CsrfService {
        self.csrf_service.as_ref()
    }

    /// Whether CSRF checks are enforced on state-changing routes
    pub fn csrf_protection(&self) -> bool {
        self.csrf_protection
    }

    // === Concurrency ===

    /// The FIFO gate serializing habit operations
    pub fn habit_gate(&self) -> &Mutex<()> {
        self.habit_gate.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &self.store.backend())
            .field("jwt_service", &self.jwt_service)
            .field("csrf_protection", &self.csrf_protection)
            .finish()
    }
}
