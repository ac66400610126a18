//! `reqwest` implementation of [`CatalogApi`].

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{ProductDetails, ProductId, Stock};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, CatalogApi};
use crate::config::CatalogApiConfig;

/// Client for the RocketShoes product/stock API.
///
/// Cheap to clone. Product details are cached for the configured TTL;
/// stock lookups always hit the API.
#[derive(Clone)]
pub struct RestCatalogClient {
    inner: Arc<RestCatalogClientInner>,
}

struct RestCatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Option<Cache<ProductId, ProductDetails>>,
}

impl RestCatalogClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let products = config.product_cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(RestCatalogClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// Resolve an API path against the configured base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }
}

#[async_trait]
impl CatalogApi for RestCatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let stock: Stock = self.get_json(&format!("stock/{id}")).await?;
        if stock.id != id {
            return Err(ApiError::Mismatch {
                requested: id,
                received: stock.id,
            });
        }
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<ProductDetails, ApiError> {
        if let Some(cache) = &self.inner.products
            && let Some(cached) = cache.get(&id).await
        {
            debug!("Cache hit for product");
            return Ok(cached);
        }

        let product: ProductDetails = self.get_json(&format!("products/{id}")).await?;
        if product.id != id {
            return Err(ApiError::Mismatch {
                requested: id,
                received: product.id,
            });
        }

        if let Some(cache) = &self.inner.products {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = CatalogApiConfig::with_base_url("https://api.example.com/shop").unwrap();
        let client = RestCatalogClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint("stock/4").unwrap().as_str(),
            "https://api.example.com/shop/stock/4"
        );
        assert_eq!(
            client.endpoint("products/4").unwrap().as_str(),
            "https://api.example.com/shop/products/4"
        );
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let mut config = CatalogApiConfig::with_base_url("http://localhost:3333").unwrap();
        config.token = Some(SecretString::from("abc\ndef"));

        let result = RestCatalogClient::new(&config);
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_cache_disabled_without_ttl() {
        let mut config = CatalogApiConfig::with_base_url("http://localhost:3333").unwrap();
        config.product_cache_ttl = None;

        let client = RestCatalogClient::new(&config).unwrap();
        assert!(client.inner.products.is_none());
    }
}
