//! Application state: the wired-up cart store and its configuration.

use std::sync::Arc;

use crate::catalog::RestCatalogClient;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::notify::Notifier;
use crate::services::CartStore;
use crate::storage::FileStore;

/// Application state shared by whatever front end drives the cart.
///
/// This struct is cheaply cloneable via `Arc`. The cart store is owned here
/// and handed out by reference; nothing else holds cart state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartStore,
}

impl AppState {
    /// Build the catalog client and file store from `config` and restore the
    /// persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built or the
    /// persisted cart cannot be read.
    pub async fn new(config: StorefrontConfig, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let catalog = RestCatalogClient::new(&config.api)?;
        let storage = FileStore::new(&config.data_dir);

        tracing::debug!(
            api = %config.api.base_url,
            data_dir = %config.data_dir.display(),
            "Initializing cart store"
        );

        let cart = CartStore::load(Arc::new(catalog), Arc::new(storage), notifier).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, cart }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
