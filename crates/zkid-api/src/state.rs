//! # Application State
//!
//! Shared state for the Axum application: the authentication core and
//! the listener configuration. Cheap to clone — handlers share one
//! [`AuthService`] behind an `Arc`.

use std::sync::Arc;

use zkid_auth::AuthService;

/// Listener configuration, built from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to bind (default 8080).
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The authentication core.
    pub auth: Arc<AuthService>,
    /// Listener configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Wrap an assembled service with default listener configuration.
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            config: AppConfig::default(),
        }
    }

    /// Wrap an assembled service with explicit configuration.
    pub fn with_config(auth: Arc<AuthService>, config: AppConfig) -> Self {
        Self { auth, config }
    }
}
