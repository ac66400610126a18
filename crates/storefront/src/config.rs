//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROCKETSHOES_API_URL` - Base URL of the product/stock API (default: `http://localhost:3333`)
//! - `ROCKETSHOES_API_TOKEN` - Bearer token sent with API requests
//! - `ROCKETSHOES_API_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `ROCKETSHOES_PRODUCT_CACHE_TTL_SECS` - Product detail cache TTL, `0` disables (default: 300)
//! - `ROCKETSHOES_DATA_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_DATA_DIR: &str = ".rocketshoes";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product/stock API configuration
    pub api: CatalogApiConfig,
    /// Directory holding the persisted key-value store
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Product/stock API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Optional per-request timeout
    pub timeout: Option<Duration>,
    /// Product detail cache TTL (`None` disables caching)
    pub product_cache_ttl: Option<Duration>,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

impl CatalogApiConfig {
    /// Configuration for an API at `base_url` with defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("ROCKETSHOES_API_URL", base_url)?,
            token: None,
            timeout: None,
            product_cache_ttl: ttl_from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "ROCKETSHOES_API_URL",
            &get_env_or_default("ROCKETSHOES_API_URL", DEFAULT_API_URL),
        )?;
        let token = get_optional_env("ROCKETSHOES_API_TOKEN").map(SecretString::from);
        let timeout = get_optional_env("ROCKETSHOES_API_TIMEOUT_SECS")
            .map(|v| parse_secs("ROCKETSHOES_API_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);
        let cache_secs = get_optional_env("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS")
            .map(|v| parse_secs("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_PRODUCT_CACHE_TTL_SECS);

        Ok(Self {
            base_url,
            token,
            timeout,
            product_cache_ttl: ttl_from_secs(cache_secs),
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = CatalogApiConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("ROCKETSHOES_DATA_DIR", DEFAULT_DATA_DIR));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            api,
            data_dir,
            sentry_dsn,
            sentry_environment,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse the API base URL, forcing a trailing slash so relative joins keep
/// any path prefix (`https://host/api` + `stock/1` -> `https://host/api/stock/1`).
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{value} cannot be used as a base URL"),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

const fn ttl_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("TEST_URL", "https://api.example.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
        assert_eq!(
            url.join("stock/3").unwrap().as_str(),
            "https://api.example.com/v1/stock/3"
        );
    }

    #[test]
    fn test_parse_base_url_root() {
        let url = parse_base_url("TEST_URL", "http://localhost:3333").unwrap();
        assert_eq!(url.join("products/1").unwrap().as_str(), "http://localhost:3333/products/1");
    }

    #[test]
    fn test_parse_base_url_invalid() {
        let err = parse_base_url("TEST_URL", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TEST_URL"));

        assert!(parse_base_url("TEST_URL", "mailto:shop@example.com").is_err());
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("TEST", " 30 ").unwrap(), 30);
        assert!(parse_secs("TEST", "-1").is_err());
        assert!(parse_secs("TEST", "soon").is_err());
    }

    #[test]
    fn test_ttl_zero_disables_cache() {
        assert_eq!(ttl_from_secs(0), None);
        assert_eq!(ttl_from_secs(60), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let mut config = CatalogApiConfig::with_base_url("http://localhost:3333").unwrap();
        config.token = Some(SecretString::from("super-private-token"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-private-token"));
    }
}
