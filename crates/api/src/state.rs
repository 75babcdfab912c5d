//! Application state
//!
//! Shared state for API handlers: the application registry (which owns the
//! per-app caches), the durable event store, and the admin auth provider.

use std::sync::Arc;

use beacon_auth::AdminAuth;
use beacon_registry::AppRegistry;
use beacon_store::EventStore;

use crate::auth::HasAdminAuth;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application registry and per-app event caches
    pub registry: Arc<AppRegistry>,
    /// Durable event store
    pub store: Arc<EventStore>,
    /// Admin auth provider (validated by the `AdminUser` extractor)
    pub auth: Arc<dyn AdminAuth>,
}

impl AppState {
    pub fn new(registry: AppRegistry, store: EventStore, auth: Arc<dyn AdminAuth>) -> Self {
        Self {
            registry: Arc::new(registry),
            store: Arc::new(store),
            auth,
        }
    }
}

impl HasAdminAuth for AppState {
    fn admin_auth(&self) -> Arc<dyn AdminAuth> {
        Arc::clone(&self.auth)
    }
}
