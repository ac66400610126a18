//! Cart store.
//!
//! Holds the current [`Cart`], mirrors every change into a
//! [`KeyValueStore`], and checks quantity increases against remote stock.
//!
//! # Operations
//!
//! - [`CartStore::add_product`] - add one unit (new products start at 1)
//! - [`CartStore::remove_product`] - drop a line item
//! - [`CartStore::update_product_amount`] - set a line item's amount
//!
//! Operations return nothing. Failures are reported through the injected
//! [`Notifier`]; the resulting state is visible through [`CartStore::cart`].
//!
//! # Concurrency
//!
//! Mutations are serialized: each operation holds a FIFO gate from its first
//! read of the cart until its storage write has finished, so overlapping
//! calls apply one after the other instead of overwriting each other.
//! [`CartStore::cart`] never waits on a remote call.
//!
//! # Commit order
//!
//! The next cart is computed in full, committed to memory, then written to
//! storage. If the write fails the in-memory commit is rolled back before the
//! gate is released.

mod error;

pub use error::CartOpError;

use std::sync::Arc;

use rocketshoes_core::{Cart, CartError, ProductId};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::catalog::CatalogApi;
use crate::error::add_breadcrumb;
use crate::notify::{Notification, Notifier};
use crate::storage::{KeyValueStore, StorageError, load_cart, save_cart};

/// Arguments for [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    /// Product to change.
    pub product_id: ProductId,
    /// Target amount. Values of zero or below are ignored.
    pub amount: i64,
}

/// Cart state container.
pub struct CartStore {
    catalog: Arc<dyn CatalogApi>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    cart: RwLock<Cart>,
    mutations: Mutex<()>,
}

impl CartStore {
    /// Create a store, restoring the cart persisted in `storage`.
    ///
    /// Starts empty when nothing is stored. A stored value that fails schema
    /// validation is logged and ignored; it is left in place until the next
    /// successful mutation overwrites it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage backend cannot be read.
    pub async fn load(
        catalog: Arc<dyn CatalogApi>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StorageError> {
        let cart = match load_cart(storage.as_ref()).await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(err) if err.is_corrupt_value() => {
                warn!(error = %err, "Ignoring malformed persisted cart");
                Cart::new()
            }
            Err(e) => return Err(e),
        };

        info!(items = cart.len(), "Cart store ready");

        Ok(Self {
            catalog,
            storage,
            notifier,
            cart: RwLock::new(cart),
            mutations: Mutex::new(()),
        })
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Add one unit of a product.
    ///
    /// Existing line items are incremented in place; new products are
    /// fetched from the catalog and appended with an amount of 1. Either way
    /// the target amount must be covered by remote stock.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        let _gate = self.mutations.lock().await;

        match self.try_add_product(product_id).await {
            Ok(cart) => {
                info!(amount = cart.amount_of(product_id), "Added product to cart");
                breadcrumb("Added product", product_id);
            }
            Err(err) => self.report(&err, Notification::AddFailed),
        }
    }

    /// Remove a product's line item.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let _gate = self.mutations.lock().await;

        match self.try_remove_product(product_id).await {
            Ok(cart) => {
                info!(remaining = cart.len(), "Removed product from cart");
                breadcrumb("Removed product", product_id);
            }
            Err(err) => self.report(&err, Notification::RemoveFailed),
        }
    }

    /// Set a product's amount, if remote stock covers it.
    ///
    /// An amount of zero or below is ignored without any notification.
    #[instrument(skip(self), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        if update.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return;
        }

        let _gate = self.mutations.lock().await;

        match self.try_update_product_amount(update).await {
            Ok(_) => {
                info!("Updated product amount");
                breadcrumb("Updated product amount", update.product_id);
            }
            Err(err) => self.report(&err, Notification::UpdateFailed),
        }
    }

    // =========================================================================
    // Operation bodies (run with the mutation gate held)
    // =========================================================================

    async fn try_add_product(&self, product_id: ProductId) -> Result<Cart, CartOpError> {
        let current = self.cart().await;
        let existing = current.get(product_id).map(|item| item.amount);
        let target = existing.map_or(1, |amount| amount.saturating_add(1));

        let stock = self.catalog.stock(product_id).await?;
        if !stock.covers(target) {
            return Err(CartOpError::OutOfStock {
                product_id,
                requested: i64::from(target),
                available: stock.amount,
            });
        }

        let next = if existing.is_some() {
            current.with_amount(product_id, target)?
        } else {
            let details = self.catalog.product(product_id).await?;
            current.with_product(details.into_line_item(1))?
        };

        self.commit(current, next).await
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<Cart, CartOpError> {
        let current = self.cart().await;
        let next = current.without(product_id)?;
        self.commit(current, next).await
    }

    async fn try_update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Result<Cart, CartOpError> {
        let UpdateProductAmount { product_id, amount } = update;

        let current = self.cart().await;
        if current.get(product_id).is_none() {
            return Err(CartError::ProductNotInCart(product_id).into());
        }

        let stock = self.catalog.stock(product_id).await?;
        let target = u32::try_from(amount)
            .ok()
            .filter(|&target| stock.covers(target))
            .ok_or(CartOpError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            })?;

        let next = current.with_amount(product_id, target)?;
        self.commit(current, next).await
    }

    /// Commit `next` to memory, then to storage. Rolls memory back to
    /// `previous` if the storage write fails.
    async fn commit(&self, previous: Cart, next: Cart) -> Result<Cart, CartOpError> {
        *self.cart.write().await = next.clone();

        if let Err(err) = save_cart(self.storage.as_ref(), &next).await {
            *self.cart.write().await = previous;
            return Err(err.into());
        }

        Ok(next)
    }

    fn report(&self, err: &CartOpError, fallback: Notification) {
        let notification = err.notification(fallback);
        match err {
            CartOpError::OutOfStock { .. } | CartOpError::Cart(_) => {
                debug!(error = %err, "Cart operation rejected");
            }
            CartOpError::Api(_) | CartOpError::Storage(_) => {
                warn!(error = %err, "Cart operation failed");
            }
        }
        self.notifier.notify(notification);
    }
}

/// Record a successful mutation in the error-tracking trail.
fn breadcrumb(message: &str, product_id: ProductId) {
    let id = product_id.to_string();
    add_breadcrumb("cart", message, Some(&[("product_id", id.as_str())]));
}
