//! Application state management.
//!
//! The shared state is cloned into each handler (cheap: everything inside is
//! an Arc or a connection manager).

use domain_sessions::{
    InMemoryUserDirectory, RevocationCoordinator, RotationEngine, SessionRegistry, SessionStore,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Redis connection manager (reconnects on its own)
    pub redis: database::redis::ConnectionManager,
    /// User directory backing login/refresh account checks.
    /// In-memory here; a deployment with a real identity system plugs its
    /// own `UserDirectory` implementation in instead.
    pub directory: InMemoryUserDirectory,
    /// Session registry (issue/verify)
    pub registry: SessionRegistry,
    /// Refresh-token rotation engine
    pub engine: RotationEngine,
    /// Logout-everywhere / anomaly response
    pub revocation: RevocationCoordinator,
}

impl AppState {
    pub fn new(config: crate::config::Config, redis: database::redis::ConnectionManager) -> Self {
        let store = SessionStore::new(redis.clone());
        let registry = SessionRegistry::new(store.clone(), config.auth.clone());
        let revocation = RevocationCoordinator::new(store);
        let engine = RotationEngine::new(registry.clone(), revocation.clone());

        Self {
            config,
            redis,
            directory: InMemoryUserDirectory::new(),
            registry,
            engine,
            revocation,
        }
    }
}
