//! Product and stock lookups against the RocketShoes REST API.
//!
//! # Architecture
//!
//! - [`CatalogApi`] is the seam the cart store depends on
//! - [`RestCatalogClient`] implements it with `reqwest`
//! - The API is the source of truth for stock - stock is never cached
//! - Product details are cached in memory via `moka` (5 minute TTL by default)
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` -> `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` -> `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::catalog::{CatalogApi, RestCatalogClient};
//!
//! let client = RestCatalogClient::new(&config.api)?;
//! let stock = client.stock(ProductId::new(1)).await?;
//! ```

mod client;

pub use client::RestCatalogClient;

use async_trait::async_trait;
use rocketshoes_core::{ProductDetails, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the product/stock API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response describes a different product than the one requested.
    #[error("Requested product {requested}, API answered for {received}")]
    Mismatch {
        requested: ProductId,
        received: ProductId,
    },

    /// Configured token cannot be sent as a header.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read access to product details and stock levels.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch the current stock record for a product. Never cached.
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;

    /// Fetch the catalog record for a product.
    async fn product(&self, id: ProductId) -> Result<ProductDetails, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("stock/7".to_string());
        assert_eq!(err.to_string(), "Not found: stock/7");

        let err = ApiError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");

        let err = ApiError::Mismatch {
            requested: ProductId::new(1),
            received: ProductId::new(2),
        };
        assert_eq!(
            err.to_string(),
            "Requested product 1, API answered for 2"
        );
    }
}
