//! Unified error handling for the storefront core.
//!
//! Parse and storage failures are recovered close to where they happen.
//! What propagates out of this crate are configuration problems and typed
//! catalog lookup failures, so callers can distinguish "nothing there" from
//! "couldn't check".

use thiserror::Error;

use crate::cart::store::StoreError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Top-level error type for the storefront core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A cart persistence backend failed.
    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    /// Whether retrying the failed operation could succeed. A definitive
    /// not-found never does; a network or timeout failure might.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Catalog(e) if e.is_transient())
    }
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Catalog(CatalogError::NotFound("widget".to_owned()));
        assert_eq!(err.to_string(), "Catalog error: Not found: widget");
    }

    #[test]
    fn test_not_found_is_terminal() {
        let err = Error::Catalog(CatalogError::NotFound("widget".to_owned()));
        assert!(!err.is_transient());

        let err = Error::Catalog(CatalogError::Timeout);
        assert!(err.is_transient());

        let err = Error::Config(ConfigError::MissingEnvVar("CATALOG_BASE_URL".to_owned()));
        assert!(!err.is_transient());
    }
}
