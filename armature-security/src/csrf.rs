//! CSRF and session collaborators.
//!
//! The manager does not implement CSRF protection itself. It asks an
//! injected [`CsrfFactory`] for the service registered under
//! [`CSRF_SERVICE_KEY`] the first time [`SecurityManager::csrf`] is called,
//! passing its configuration and the current session, and keeps that
//! instance for its whole lifetime.
//!
//! [`SecurityManager::csrf`]: crate::SecurityManager::csrf

use crate::config::SecurityConfig;
use crate::error::Result;
use serde_json::Value;
use std::sync::Arc;

/// Service key the CSRF factory is asked for
pub const CSRF_SERVICE_KEY: &str = "security.csrf";

/// The current user session
pub trait Session: Send + Sync {
    fn id(&self) -> String;

    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value);
}

/// Supplies the session of the request being handled
pub trait SessionProvider: Send + Sync {
    fn session(&self) -> Result<Arc<dyn Session>>;
}

/// Token issuing and checking
pub trait CsrfService: Send + Sync {
    /// Current token, creating one if needed
    fn token(&self) -> Result<String>;

    fn check_token(&self, token: &str) -> bool;
}

/// Builds the CSRF service for a manager
pub trait CsrfFactory: Send + Sync {
    fn create(
        &self,
        key: &str,
        config: &SecurityConfig,
        session: Arc<dyn Session>,
    ) -> Result<Arc<dyn CsrfService>>;
}
