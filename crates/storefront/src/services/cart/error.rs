//! Cart operation error types.

use rocketshoes_core::{CartError, ProductId};
use thiserror::Error;

use crate::catalog::ApiError;
use crate::notify::Notification;
use crate::storage::StorageError;

/// Errors that abort a cart operation.
///
/// These never reach the caller of a [`CartStore`](super::CartStore)
/// operation; each one is logged and turned into a [`Notification`].
#[derive(Debug, Error)]
pub enum CartOpError {
    /// Requested quantity exceeds remote stock.
    #[error("product {product_id}: requested {requested}, {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// Cart transformation rejected the change.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Product or stock lookup failed.
    #[error("catalog error: {0}")]
    Api(#[from] ApiError),

    /// Persisting the new cart failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartOpError {
    /// Notification to show for this error; `fallback` is the operation's
    /// generic failure message.
    #[must_use]
    pub const fn notification(&self, fallback: Notification) -> Notification {
        match self {
            Self::OutOfStock { .. } => Notification::OutOfStock,
            _ => fallback,
        }
    }
}
