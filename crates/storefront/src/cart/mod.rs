//! Cart session engine: pure cart state plus dual-store persistence.
//!
//! The in-memory [`Cart`] is authoritative for the session. Every mutation
//! re-persists it: a non-empty cart is serialized once and written to every
//! backend; an empty cart clears the backends instead, so no store
//! accumulates phantom empty lists.
//!
//! The backends are shared across browser contexts with no coordination, so
//! two concurrent sessions can silently clobber each other's writes
//! (last-write-wins). Known gap; see DESIGN.md.

pub mod store;

use ironvale_core::{Cart, CartLine, Product, ProductId};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use store::CartStore;

/// A session-scoped cart bound to a priority-ordered list of persistence
/// backends.
pub struct CartSession {
    cart: Cart,
    stores: Vec<Box<dyn CartStore>>,
}

impl CartSession {
    /// Start a session by restoring the cart from the first backend that
    /// has a payload.
    ///
    /// A payload that does not parse as a line array degrades silently to
    /// an empty cart; a bad cookie must never crash the session.
    #[must_use]
    pub fn load(stores: Vec<Box<dyn CartStore>>) -> Self {
        let cart = read_persisted(&stores);
        Self { cart, stores }
    }

    /// Add one unit of `product` and re-persist.
    pub fn add_item(&mut self, product: &Product) {
        self.cart.add(product);
        self.persist();
    }

    /// Remove the line for `id` and re-persist. Absent ids are a no-op.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.cart.remove(id);
        self.persist();
    }

    /// Set the quantity for `id` and re-persist. Zero or less removes the
    /// line.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.cart.set_quantity(id, quantity);
        self.persist();
    }

    /// Empty the cart and clear every backend.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// The current cart state.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Total unit count.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Total price.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Write the current state to every backend.
    ///
    /// Backend failures are logged, never propagated: the in-memory cart
    /// stays authoritative and the next mutation retries the write.
    fn persist(&mut self) {
        if self.cart.is_empty() {
            for store in &mut self.stores {
                if let Err(e) = store.clear() {
                    warn!(store = store.name(), error = %e, "failed to clear cart store");
                }
            }
            return;
        }

        let payload = match serde_json::to_string(self.cart.lines()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize cart");
                return;
            }
        };

        for store in &mut self.stores {
            if let Err(e) = store.save(&payload) {
                warn!(store = store.name(), error = %e, "failed to persist cart");
            }
        }
    }
}

/// Read the cart back from the first backend holding a payload.
fn read_persisted(stores: &[Box<dyn CartStore>]) -> Cart {
    for store in stores {
        match store.load() {
            Ok(Some(payload)) => {
                return serde_json::from_str::<Vec<CartLine>>(&payload).map_or_else(
                    |e| {
                        warn!(
                            store = store.name(),
                            error = %e,
                            "persisted cart is corrupt; starting empty"
                        );
                        Cart::new()
                    },
                    Cart::from_lines,
                );
            }
            Ok(None) => {
                debug!(store = store.name(), "no persisted cart");
            }
            Err(e) => {
                warn!(store = store.name(), error = %e, "cart store unreadable; trying next");
            }
        }
    }
    Cart::new()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::store::{CartStore, CookieStore, MemoryStore};
    use super::*;
    use ironvale_core::ProductId;

    fn product(id: &str, price: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "slug": id.to_lowercase(),
            "price": price.to_string(),
            "stockQuantity": 5,
            "sku": format!("SKU-{id}")
        }))
        .unwrap()
    }

    fn session_over(
        memory: &MemoryStore,
        cookies: &CookieStore,
    ) -> CartSession {
        CartSession::load(vec![memory.clone().boxed(), cookies.clone().boxed()])
    }

    #[test]
    fn test_cart_round_trips_through_reload() {
        let memory = MemoryStore::new();
        let cookies = CookieStore::new();

        let mut session = session_over(&memory, &cookies);
        session.add_item(&product("P1", 100));
        session.add_item(&product("P2", 40));
        session.add_item(&product("P1", 100));
        drop(session);

        // Simulated reload: a fresh session over the same backends.
        let restored = session_over(&memory, &cookies);
        let lines = restored.cart().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, ProductId::new("P1"));
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].sku.as_deref(), Some("SKU-P1"));
        assert_eq!(lines[1].product_id, ProductId::new("P2"));
        assert_eq!(restored.total_price(), Decimal::from(240));
    }

    #[test]
    fn test_cookie_fallback_when_structured_store_is_empty() {
        let memory = MemoryStore::new();
        let cookies = CookieStore::new();

        // Populate both stores, then lose the structured one (e.g. the
        // host cleared site data but the cookie survived).
        let mut session = session_over(&memory, &cookies);
        session.add_item(&product("P1", 10));
        drop(session);
        let mut wiped = memory.clone();
        CartStore::clear(&mut wiped).unwrap();

        let restored = session_over(&memory, &cookies);
        assert_eq!(restored.total_items(), 1);
    }

    #[test]
    fn test_corrupt_cookie_degrades_to_empty_cart() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("ironvale_storefront=warn")
            .try_init();

        let cookies = CookieStore::new();
        let mut seeded = cookies.clone();
        CartStore::save(&mut seeded, "not-json").unwrap();

        let session = CartSession::load(vec![cookies.clone().boxed()]);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_non_array_payload_degrades_to_empty_cart() {
        let memory = MemoryStore::new();
        let mut seeded = memory.clone();
        CartStore::save(&mut seeded, "{\"not\":\"a list\"}").unwrap();

        let session = CartSession::load(vec![memory.clone().boxed()]);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_emptying_cart_clears_both_stores() {
        let memory = MemoryStore::new();
        let cookies = CookieStore::new();

        let mut session = session_over(&memory, &cookies);
        session.add_item(&product("P1", 100));
        assert!(memory.load().unwrap().is_some());
        assert!(cookies.load().unwrap().is_some());

        session.set_quantity(&ProductId::new("P1"), 0);
        assert!(session.cart().is_empty());
        assert_eq!(memory.load().unwrap(), None);
        assert_eq!(cookies.load().unwrap(), None);
    }

    #[test]
    fn test_clear_empties_cart_and_stores() {
        let memory = MemoryStore::new();
        let cookies = CookieStore::new();

        let mut session = session_over(&memory, &cookies);
        session.add_item(&product("P1", 100));
        session.add_item(&product("P2", 50));
        session.clear();

        assert!(session.cart().is_empty());
        assert_eq!(memory.load().unwrap(), None);
        assert_eq!(cookies.load().unwrap(), None);
    }

    #[test]
    fn test_structured_store_wins_over_cookie() {
        let memory = MemoryStore::new();
        let cookies = CookieStore::new();

        let mut memory_writer = memory.clone();
        let mut cookie_writer = cookies.clone();
        CartStore::save(
            &mut memory_writer,
            "[{\"productId\":\"P1\",\"name\":\"A\",\"price\":\"10\",\"quantity\":1}]",
        )
        .unwrap();
        CartStore::save(
            &mut cookie_writer,
            "[{\"productId\":\"P2\",\"name\":\"B\",\"price\":\"20\",\"quantity\":9}]",
        )
        .unwrap();

        let session = session_over(&memory, &cookies);
        assert_eq!(session.cart().lines().len(), 1);
        assert_eq!(session.cart().lines()[0].product_id, ProductId::new("P1"));
    }

    #[test]
    fn test_mutations_persist_on_every_change() {
        let memory = MemoryStore::new();
        let cookies = CookieStore::new();

        let mut session = session_over(&memory, &cookies);
        session.add_item(&product("P1", 100));
        let after_add = memory.load().unwrap().unwrap();

        session.set_quantity(&ProductId::new("P1"), 3);
        let after_update = memory.load().unwrap().unwrap();
        assert_ne!(after_add, after_update);

        let lines: Vec<CartLine> = serde_json::from_str(&after_update).unwrap();
        assert_eq!(lines[0].quantity, 3);
    }
}
