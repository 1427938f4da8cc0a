//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use authgate_auth::{ResourceGuard, SessionManager};
use authgate_core::config::AppConfig;
use authgate_core::result::AppResult;
use authgate_database::CredentialStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Credential store (PostgreSQL or in-memory)
    pub store: Arc<dyn CredentialStore>,
    /// Register/login/refresh/logout flows
    pub session_manager: Arc<SessionManager>,
    /// Stateless access token guard
    pub resource_guard: Arc<ResourceGuard>,
}

impl AppState {
    /// Wires the auth services around `store`.
    pub fn new(config: AppConfig, store: Arc<dyn CredentialStore>) -> AppResult<Self> {
        let session_manager = SessionManager::new(&config.auth, Arc::clone(&store))?;
        let resource_guard = ResourceGuard::new(&config.auth);

        Ok(Self {
            config: Arc::new(config),
            store,
            session_manager: Arc::new(session_manager),
            resource_guard: Arc::new(resource_guard),
        })
    }
}
