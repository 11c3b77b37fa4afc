//! Cart persistence backends.
//!
//! Persistence is an explicit priority-ordered list of backends: reads try
//! each in order and stop at the first that has a payload, writes fan out
//! to all of them. Adding a third backend never touches call sites.
//!
//! Both shipped backends share their underlying cells across clones, the
//! way browser storage is shared across same-origin contexts. Two sessions
//! writing through clones of the same store observe last-write-wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cookie::time::Duration;
use cookie::{Cookie, CookieJar, SameSite};
use thiserror::Error;

/// Structured store key for the persisted cart payload.
pub const CART_FALLBACK_KEY: &str = "cart_fallback";

/// Cookie name for the persisted cart payload.
pub const CART_COOKIE_NAME: &str = "cart";

/// Cart cookie lifetime in seconds (7 days).
const CART_COOKIE_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Errors a persistence backend can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be read or written.
    #[error("cart store {0} unavailable: {1}")]
    Unavailable(&'static str, String),
}

/// One cart persistence backend.
///
/// Payloads are opaque strings; the session layer owns serialization, so a
/// backend never needs to understand the cart shape.
pub trait CartStore: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &'static str;

    /// Read the persisted payload, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend is unreadable.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Write the serialized line array.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend rejects the write.
    fn save(&mut self, payload: &str) -> Result<(), StoreError>;

    /// Remove the persisted payload entirely.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend rejects the removal.
    fn clear(&mut self) -> Result<(), StoreError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// Structured same-origin store backend (key `cart_fallback`, no expiry).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cells: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Box the store for a session backend list.
    #[must_use]
    pub fn boxed(self) -> Box<dyn CartStore> {
        Box::new(self)
    }
}

impl CartStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        let cells = self
            .cells
            .lock()
            .map_err(|e| StoreError::Unavailable(self.name(), e.to_string()))?;
        Ok(cells.get(CART_FALLBACK_KEY).cloned())
    }

    fn save(&mut self, payload: &str) -> Result<(), StoreError> {
        let mut cells = self
            .cells
            .lock()
            .map_err(|e| StoreError::Unavailable(self.name(), e.to_string()))?;
        cells.insert(CART_FALLBACK_KEY.to_owned(), payload.to_owned());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let mut cells = self
            .cells
            .lock()
            .map_err(|e| StoreError::Unavailable(self.name(), e.to_string()))?;
        cells.remove(CART_FALLBACK_KEY);
        Ok(())
    }
}

// =============================================================================
// CookieStore
// =============================================================================

/// Cookie-backed store: the cart payload lives in a `cart` cookie with a
/// 7-day Max-Age. Clearing issues a removal cookie.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    jar: Arc<Mutex<CookieJar>>,
}

impl CookieStore {
    /// Create a store over an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a jar already populated from request headers.
    #[must_use]
    pub fn from_jar(jar: CookieJar) -> Self {
        Self {
            jar: Arc::new(Mutex::new(jar)),
        }
    }

    /// Box the store for a session backend list.
    #[must_use]
    pub fn boxed(self) -> Box<dyn CartStore> {
        Box::new(self)
    }

    /// Snapshot of the jar, e.g. to emit `Set-Cookie` deltas.
    #[must_use]
    pub fn jar(&self) -> CookieJar {
        self.jar
            .lock()
            .map_or_else(|_| CookieJar::new(), |jar| jar.clone())
    }
}

impl CartStore for CookieStore {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        let jar = self
            .jar
            .lock()
            .map_err(|e| StoreError::Unavailable(self.name(), e.to_string()))?;
        Ok(jar.get(CART_COOKIE_NAME).map(|c| c.value().to_owned()))
    }

    fn save(&mut self, payload: &str) -> Result<(), StoreError> {
        let cookie = Cookie::build((CART_COOKIE_NAME, payload.to_owned()))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(CART_COOKIE_MAX_AGE_SECONDS))
            .build();

        let mut jar = self
            .jar
            .lock()
            .map_err(|e| StoreError::Unavailable(self.name(), e.to_string()))?;
        jar.add(cookie);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let mut jar = self
            .jar
            .lock()
            .map_err(|e| StoreError::Unavailable(self.name(), e.to_string()))?;
        jar.remove(CART_COOKIE_NAME);
        Ok(())
    }
}
