//! Catalog entity types.
//!
//! These entities are owned by the external catalog service and fetched
//! read-only. Serde attributes follow the service's camelCase wire format;
//! `_id` aliases tolerate payloads from its document store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{BrandId, CategoryId, ProductId, SubcategoryId};

// =============================================================================
// Reference Deserializers
// =============================================================================

/// Deserialize an entity reference that arrives either as a bare id string
/// or as an embedded object carrying its own id.
fn entity_ref<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: From<String>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Id(String),
        Embedded {
            #[serde(alias = "_id")]
            id: String,
        },
    }

    let repr = Repr::deserialize(deserializer)?;
    Ok(match repr {
        Repr::Id(id) | Repr::Embedded { id } => T::from(id),
    })
}

/// Optional variant of [`entity_ref`]; `null` and absent fields map to `None`.
fn opt_entity_ref<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: From<String>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Id(String),
        Embedded {
            #[serde(alias = "_id")]
            id: String,
        },
    }

    let repr = Option::<Repr>::deserialize(deserializer)?;
    Ok(repr.map(|r| match r {
        Repr::Id(id) | Repr::Embedded { id } => T::from(id),
    }))
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product.
///
/// `sub_category`'s parent is expected to equal `category` (the service
/// enforces this); a mismatched pair is carried as-is rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Service-issued product id.
    #[serde(alias = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL slug, unique across all entity kinds.
    pub slug: String,
    /// Regular price.
    #[serde(default)]
    pub price: Decimal,
    /// Discounted price; less than `price` when present.
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// Units available; never negative on a well-behaved service.
    #[serde(default)]
    pub stock_quantity: i64,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Primary image URL.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Brand facet reference.
    #[serde(default, deserialize_with = "opt_entity_ref")]
    pub brand: Option<BrandId>,
    /// Category facet reference.
    #[serde(default, deserialize_with = "opt_entity_ref")]
    pub category: Option<CategoryId>,
    /// Subcategory facet reference.
    #[serde(default, deserialize_with = "opt_entity_ref")]
    pub sub_category: Option<SubcategoryId>,
    /// Creation timestamp, used by recency sorting on the service side.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The price a buyer pays right now: the sale price when one is set,
    /// the regular price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

// =============================================================================
// Taxonomy Entities
// =============================================================================

/// A top-level product category. Owns zero or more subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Service-issued category id.
    #[serde(alias = "_id")]
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// A subcategory; exists within exactly one parent category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    /// Service-issued subcategory id.
    #[serde(alias = "_id")]
    pub id: SubcategoryId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Parent category reference.
    #[serde(deserialize_with = "entity_ref")]
    pub category: CategoryId,
}

/// A brand. Independent facet, not nested under categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Service-issued brand id.
    #[serde(alias = "_id")]
    pub id: BrandId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

// =============================================================================
// Taxonomy Union
// =============================================================================

/// Discriminant for the three taxonomy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKind {
    /// A [`Category`].
    Category,
    /// A [`Brand`].
    Brand,
    /// A [`Subcategory`].
    Subcategory,
}

impl TargetKind {
    /// Wire-format name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Subcategory => "subcategory",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Category, Brand, or Subcategory treated polymorphically.
///
/// Used wherever logic must handle the three kinds uniformly: slug
/// resolution results, priority-ordered navigation listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TaxonomyNode {
    /// A top-level category.
    Category(Category),
    /// A brand.
    Brand(Brand),
    /// A subcategory.
    Subcategory(Subcategory),
}

impl TaxonomyNode {
    /// The kind discriminant of this node.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Category(_) => TargetKind::Category,
            Self::Brand(_) => TargetKind::Brand,
            Self::Subcategory(_) => TargetKind::Subcategory,
        }
    }

    /// The node's entity id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Category(c) => c.id.as_str(),
            Self::Brand(b) => b.id.as_str(),
            Self::Subcategory(s) => s.id.as_str(),
        }
    }

    /// The node's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Category(c) => &c.name,
            Self::Brand(b) => &b.name,
            Self::Subcategory(s) => &s.name,
        }
    }

    /// The node's URL slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Self::Category(c) => &c.slug,
            Self::Brand(b) => &b.slug,
            Self::Subcategory(s) => &s.slug,
        }
    }
}

// =============================================================================
// Priority Entries
// =============================================================================

/// Highest navigation priority level; values above it are clamped.
pub const MAX_PRIORITY_LEVEL: i64 = 10;

/// A navigation priority assignment for one taxonomy entity.
///
/// Conceptually at most one exists per `(target_type, target_id)` pair;
/// duplicates from the service are tolerated with the last-sorted entry
/// winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityEntry {
    /// Service-issued entry id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Kind of the entity this entry ranks.
    pub target_type: TargetKind,
    /// Id of the entity this entry ranks.
    pub target_id: String,
    /// Name shown in navigation.
    #[serde(default)]
    pub display_name: String,
    /// Raw level from the service; read through [`PriorityEntry::level`].
    #[serde(default)]
    level: i64,
}

impl PriorityEntry {
    /// Create a priority entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        target_type: TargetKind,
        target_id: impl Into<String>,
        display_name: impl Into<String>,
        level: i64,
    ) -> Self {
        Self {
            id: id.into(),
            target_type,
            target_id: target_id.into(),
            display_name: display_name.into(),
            level,
        }
    }

    /// Level clamped to `0..=MAX_PRIORITY_LEVEL`. Out-of-range values from
    /// the service are clamped, not rejected.
    #[must_use]
    pub const fn level(&self) -> i64 {
        if self.level < 0 {
            0
        } else if self.level > MAX_PRIORITY_LEVEL {
            MAX_PRIORITY_LEVEL
        } else {
            self.level
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_with_bare_refs() {
        let json = r#"{
            "id": "P1",
            "name": "Vibration Sensor",
            "slug": "vibration-sensor",
            "price": "149.00",
            "stockQuantity": 3,
            "brand": "B1",
            "category": "C1",
            "subCategory": "S1"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "P1");
        assert_eq!(product.brand.as_ref().unwrap().as_str(), "B1");
        assert_eq!(product.category.as_ref().unwrap().as_str(), "C1");
        assert_eq!(product.sub_category.as_ref().unwrap().as_str(), "S1");
        assert!(product.in_stock());
    }

    #[test]
    fn test_product_with_embedded_refs() {
        let json = r#"{
            "_id": "P2",
            "name": "Pressure Gauge",
            "slug": "pressure-gauge",
            "price": "80.00",
            "salePrice": "64.00",
            "category": {"_id": "C1", "name": "Sensors", "slug": "sensors"},
            "brand": {"id": "B2"}
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "P2");
        assert_eq!(product.category.as_ref().unwrap().as_str(), "C1");
        assert_eq!(product.brand.as_ref().unwrap().as_str(), "B2");
        assert_eq!(product.effective_price(), Decimal::from(64));
    }

    #[test]
    fn test_effective_price_without_sale() {
        let json = r#"{"id": "P3", "name": "Relay", "slug": "relay", "price": "12.50"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.effective_price(), "12.50".parse::<Decimal>().unwrap());
        assert!(!product.in_stock());
    }

    #[test]
    fn test_subcategory_parent_ref() {
        let json = r#"{
            "_id": "S1",
            "name": "Vibration",
            "slug": "vibration",
            "category": {"_id": "C1", "name": "Sensors", "slug": "sensors"}
        }"#;
        let sub: Subcategory = serde_json::from_str(json).unwrap();
        assert_eq!(sub.category.as_str(), "C1");
    }

    #[test]
    fn test_target_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&TargetKind::Subcategory).unwrap(),
            "\"subcategory\""
        );
        let kind: TargetKind = serde_json::from_str("\"brand\"").unwrap();
        assert_eq!(kind, TargetKind::Brand);
    }

    #[test]
    fn test_priority_level_clamped() {
        let high = PriorityEntry::new("e1", TargetKind::Brand, "B1", "Acme", 99);
        assert_eq!(high.level(), MAX_PRIORITY_LEVEL);

        let low = PriorityEntry::new("e2", TargetKind::Brand, "B2", "Other", -4);
        assert_eq!(low.level(), 0);

        let in_range = PriorityEntry::new("e3", TargetKind::Brand, "B3", "Mid", 7);
        assert_eq!(in_range.level(), 7);
    }

    #[test]
    fn test_taxonomy_node_accessors() {
        let node = TaxonomyNode::Category(Category {
            id: CategoryId::new("C1"),
            name: "Sensors".to_owned(),
            slug: "sensors".to_owned(),
        });
        assert_eq!(node.kind(), TargetKind::Category);
        assert_eq!(node.id(), "C1");
        assert_eq!(node.slug(), "sensors");
    }
}
