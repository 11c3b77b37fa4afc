//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_BASE_URL` - Base URL of the catalog lookup service
//!
//! ## Optional
//! - `CATALOG_ACCESS_TOKEN` - Bearer token issued by the auth layer
//! - `CATALOG_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Read cache TTL in seconds (default: 300)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog lookup service configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog service.
    pub base_url: Url,
    /// Bearer token issued by the auth layer; carried on every request.
    pub access_token: Option<SecretString>,
    /// Per-request timeout. Timed-out lookups are transient failures.
    pub timeout: Duration,
    /// Time-to-live for cached read-mostly responses.
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url("CATALOG_BASE_URL", &get_required_env("CATALOG_BASE_URL")?)?;
        let access_token = get_optional_env("CATALOG_ACCESS_TOKEN").map(SecretString::from);
        let timeout = parse_seconds(
            "CATALOG_TIMEOUT_SECS",
            &get_env_or_default("CATALOG_TIMEOUT_SECS", "10"),
        )?;
        let cache_ttl = parse_seconds(
            "CATALOG_CACHE_TTL_SECS",
            &get_env_or_default("CATALOG_CACHE_TTL_SECS", "300"),
        )?;

        Ok(Self {
            base_url,
            access_token,
            timeout,
            cache_ttl,
        })
    }

    /// Build a configuration directly, for hosts that do not use the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            access_token: None,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a whole-second duration value.
fn parse_seconds(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// Parse and validate the catalog base URL. Path segments are appended to
/// it later, so it must be an absolute URL with a host.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            "must be an absolute URL with a host".to_owned(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(
            parse_seconds("T", "15").unwrap(),
            Duration::from_secs(15)
        );
        assert!(parse_seconds("T", "soon").is_err());
    }

    #[test]
    fn test_parse_base_url_rejects_non_base() {
        assert!(parse_base_url("U", "mailto:ops@ironvale.dev").is_err());
        assert!(parse_base_url("U", "not a url").is_err());
        assert!(parse_base_url("U", "https://catalog.ironvale.dev/api").is_ok());
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let mut config = CatalogConfig::new("https://catalog.ironvale.dev").unwrap();
        config.access_token = Some(SecretString::from("tok_4f9a71c2e8b05d36"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok_4f9a71c2e8b05d36"));
    }
}
