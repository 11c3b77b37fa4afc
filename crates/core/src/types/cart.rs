//! Cart state: an ordered, deduplicated list of line items with derived
//! totals.
//!
//! Each line snapshots the product's display fields at the moment it is
//! added; later catalog changes never alter existing lines. Totals are
//! recomputed from the lines on every read, so they cannot drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::catalog::Product;
use crate::types::id::ProductId;

/// One cart line: a product key plus the price-at-add-time snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product key; exactly one line exists per product.
    pub product_id: ProductId,
    /// Name captured when the line was created.
    pub name: String,
    /// Regular price captured when the line was created.
    pub price: Decimal,
    /// Sale price captured when the line was created.
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// Cover image URL captured when the line was created.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// SKU captured when the line was created.
    #[serde(default)]
    pub sku: Option<String>,
    /// Units of this product in the cart; at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Capture a new line from the product's current display fields.
    fn snapshot(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            sale_price: product.sale_price,
            cover_image: product.cover_image.clone(),
            sku: product.sku.clone(),
            quantity: 1,
        }
    }

    /// Unit price in effect when the line was created: the snapshotted sale
    /// price when one was set, the snapshotted regular price otherwise.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price()
    }
}

/// An ordered, deduplicated cart.
///
/// Insertion order is preserved across quantity changes; removal is the only
/// operation that drops a position. Serializes transparently as the line
/// array, which is also the persisted wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from previously persisted lines.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line's quantity when the product is already
    /// in the cart; otherwise appends a new line with quantity 1 and a
    /// snapshot of the product's display fields.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::snapshot(product));
        }
    }

    /// Remove the line for `id`. Absent ids are a no-op, not an error.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|line| &line.product_id != id);
    }

    /// Set the quantity for `id`.
    ///
    /// A quantity of zero or less behaves exactly like [`Cart::remove`].
    /// Absent ids are a no-op.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| &line.product_id == id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total unit count, recomputed from the lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Total price, recomputed from the lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::id::ProductId;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: id.to_lowercase(),
            price: Decimal::from(price),
            sale_price: None,
            stock_quantity: 10,
            sku: Some(format!("SKU-{id}")),
            cover_image: None,
            brand: None,
            category: None,
            sub_category: None,
            created_at: None,
        }
    }

    #[test]
    fn test_repeated_add_increments_single_line() {
        let mut cart = Cart::new();
        let p1 = product("P1", 100);

        cart.add(&p1);
        cart.add(&p1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Decimal::from(200));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(&product("P1", 10));

        let id = ProductId::new("P1");
        cart.remove(&id);
        let after_first = cart.clone();
        cart.remove(&id);

        assert_eq!(cart, after_first);
        assert!(cart.is_empty());

        // Removing an id that never existed is also a no-op.
        cart.remove(&ProductId::new("nope"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let p1 = product("P1", 100);

        let mut removed = Cart::new();
        removed.add(&p1);
        removed.remove(&ProductId::new("P1"));

        let mut zeroed = Cart::new();
        zeroed.add(&p1);
        zeroed.set_quantity(&ProductId::new("P1"), 0);

        assert_eq!(removed, zeroed);
    }

    #[test]
    fn test_set_quantity_updates_matching_line() {
        let mut cart = Cart::new();
        cart.add(&product("P1", 25));

        cart.set_quantity(&ProductId::new("P1"), 4);
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.total_price(), Decimal::from(100));

        // Absent id: state unchanged.
        cart.set_quantity(&ProductId::new("P9"), 3);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(&product("P1", 1));
        cart.add(&product("P2", 2));
        cart.add(&product("P3", 3));
        cart.add(&product("P1", 1));
        cart.set_quantity(&ProductId::new("P3"), 7);

        let ids: Vec<&str> = cart
            .lines()
            .iter()
            .map(|line| line.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_sale_price_used_in_totals() {
        let mut on_sale = product("P1", 100);
        on_sale.sale_price = Some(Decimal::from(80));

        let mut cart = Cart::new();
        cart.add(&on_sale);
        cart.add(&on_sale);

        assert_eq!(cart.total_price(), Decimal::from(160));
    }

    #[test]
    fn test_snapshot_is_decoupled_from_catalog() {
        let mut p1 = product("P1", 100);
        let mut cart = Cart::new();
        cart.add(&p1);

        // Catalog price changes after the line was created.
        p1.price = Decimal::from(500);
        p1.name = "Renamed".to_owned();

        assert_eq!(cart.lines()[0].price, Decimal::from(100));
        assert_eq!(cart.lines()[0].name, "Product P1");
        assert_eq!(cart.total_price(), Decimal::from(100));
    }

    #[test]
    fn test_totals_match_independent_recompute() {
        let mut cart = Cart::new();
        let mut p2 = product("P2", 35);
        p2.sale_price = Some(Decimal::from(30));

        cart.add(&product("P1", 12));
        cart.add(&p2);
        cart.set_quantity(&ProductId::new("P2"), 3);

        let expected: Decimal = cart
            .lines()
            .iter()
            .map(|line| Decimal::from(line.quantity) * line.sale_price.unwrap_or(line.price))
            .sum();
        assert_eq!(cart.total_price(), expected);

        let expected_items: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
        assert_eq!(cart.total_items(), expected_items);
    }

    #[test]
    fn test_cart_serializes_as_bare_array() {
        let mut cart = Cart::new();
        cart.add(&product("P1", 10));

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
