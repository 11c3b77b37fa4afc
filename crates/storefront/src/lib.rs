//! Ironvale Storefront core.
//!
//! This crate is the catalog-facing heart of the storefront: it resolves
//! slugs from a single flat namespace into typed entities, maintains the
//! faceted product filter, and keeps a session-local cart alive across
//! reloads through a priority-ordered list of persistence backends.
//!
//! The catalog service owns all entity storage; this crate only reads from
//! it. Rendering, checkout, and authentication live elsewhere - the
//! storefront merely carries the token the auth layer issued.
//!
//! # Example
//!
//! ```rust,ignore
//! use ironvale_storefront::cart::store::{CookieStore, MemoryStore};
//! use ironvale_storefront::config::CatalogConfig;
//! use ironvale_storefront::session::StorefrontSession;
//!
//! let config = CatalogConfig::from_env()?;
//! let stores = vec![MemoryStore::new().boxed(), CookieStore::new().boxed()];
//! let mut session = StorefrontSession::start(&config, stores).await?;
//!
//! match session.navigate("industrial-sensors").await? {
//!     PageView::Listing(products) => { /* render the listing */ }
//!     PageView::Item(product) => { /* render the product page */ }
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod session;
pub mod taxonomy;

pub use cart::CartSession;
pub use catalog::{CatalogClient, CatalogError, Resolution};
pub use config::{CatalogConfig, ConfigError};
pub use error::{Error, Result};
pub use filter::{FilterState, SortBy, SortOrder};
pub use session::{PageView, StorefrontSession};
pub use taxonomy::TaxonomyIndex;
