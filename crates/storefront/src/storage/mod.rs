//! Key-value persistence for client-side state.
//!
//! The cart is persisted as a single JSON document under [`keys::CART`].
//! Backends only need to store strings by key:
//!
//! - [`FileStore`] - one file per key in a data directory (the CLI default)
//! - [`MemoryStore`] - process-local map, used in tests
//!
//! [`load_cart`] and [`save_cart`] form the serialization boundary between
//! a backend and the in-memory [`Cart`](rocketshoes_core::Cart).

mod cart;
mod file;
mod memory;

pub use cart::{load_cart, save_cart};
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from storage backends and the cart serialization boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Stored value exists but does not match the expected schema.
    #[error("Malformed value under {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored bytes under a key are not valid UTF-8.
    #[error("Value under {key} is not valid UTF-8: {source}")]
    NotUtf8 {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl StorageError {
    /// Whether the stored value is unreadable as opposed to the backend failing.
    #[must_use]
    pub const fn is_corrupt_value(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::NotUtf8 { .. })
    }
}

/// A string key-value store.
///
/// Methods take `&self`; implementations use interior mutability.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Succeeds if the key did not exist.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage keys.
pub mod keys {
    /// Key holding the serialized cart.
    pub const CART: &str = "@RocketShoes:cart";
}
