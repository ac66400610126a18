//! Serialization boundary between a [`KeyValueStore`] and the [`Cart`].

use rocketshoes_core::Cart;
use tracing::debug;

use super::{KeyValueStore, StorageError, keys};

/// Load the persisted cart.
///
/// Returns `Ok(None)` when nothing has been stored yet. The stored JSON is
/// validated on the way in: duplicate product IDs or zero amounts are
/// reported as [`StorageError::Malformed`], like any other schema mismatch.
///
/// # Errors
///
/// Returns `StorageError::Io` if the backend fails and
/// `StorageError::Malformed` if the stored value is not a valid cart.
pub async fn load_cart(store: &dyn KeyValueStore) -> Result<Option<Cart>, StorageError> {
    let Some(raw) = store.get(keys::CART).await? else {
        return Ok(None);
    };

    let cart: Cart = serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
        key: keys::CART.to_string(),
        source,
    })?;

    debug!(items = cart.len(), "Loaded persisted cart");
    Ok(Some(cart))
}

/// Overwrite the persisted cart with `cart`.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the backend write fails.
pub async fn save_cart(store: &dyn KeyValueStore, cart: &Cart) -> Result<(), StorageError> {
    let raw = serde_json::to_string(cart)?;
    store.set(keys::CART, &raw).await
}
