//! Catalog lookup service client.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest`; the service owns all catalog storage
//! - The service guarantees slug uniqueness across all entity kinds
//! - In-memory caching via `moka` for read-mostly responses (5 minute TTL
//!   by default)
//!
//! # Example
//!
//! ```rust,ignore
//! use ironvale_storefront::catalog::{CatalogClient, Resolution};
//!
//! let client = CatalogClient::new(&config);
//!
//! match client.resolve("industrial-sensors").await? {
//!     Resolution::Product(product) => { /* single-item view */ }
//!     Resolution::Node(node) => { /* listing seeded by the node */ }
//!     Resolution::Fallback(stub) => { /* generic listing */ }
//! }
//! ```

mod cache;
mod client;
mod resolve;

pub use client::CatalogClient;
pub use resolve::{EntityStub, Resolution};

use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("Catalog returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading fragment of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The slug or id resolves to nothing. Terminal; retrying cannot help.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl CatalogError {
    /// Whether the failure is transient and worth retrying. `NotFound` is a
    /// definitive answer; transport failures and server-side errors are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Parse(_) | Self::NotFound(_) => false,
        }
    }
}
