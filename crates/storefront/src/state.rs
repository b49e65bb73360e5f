//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::Store;
use crate::services::CredentialHasher;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn Store>,
    hasher: CredentialHasher,
}

impl AppState {
    /// Create a new application state with the default password hasher.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Persistence gateway (`PgStore` in production)
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn Store>) -> Self {
        Self::with_hasher(config, store, CredentialHasher::default())
    }

    /// Create application state with an explicit password hasher.
    #[must_use]
    pub fn with_hasher(
        config: StorefrontConfig,
        store: Arc<dyn Store>,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                hasher,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the persistence gateway.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get a reference to the password hasher.
    #[must_use]
    pub fn hasher(&self) -> &CredentialHasher {
        &self.inner.hasher
    }
}
