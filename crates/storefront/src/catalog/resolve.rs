//! Slug resolution over the flat entity namespace.
//!
//! One slug names exactly one entity of one of four kinds; the service
//! tags the payload with its kind. Classification is a pure function over
//! the payload so it can be tested without HTTP.

use ironvale_core::{Product, TaxonomyNode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::CatalogError;

/// The raw shape of an entity whose type tag was missing or unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStub {
    /// Service-issued entity id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// What a slug resolved to. Callers must match every variant; the absent
/// case is [`CatalogError::NotFound`].
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A single product; rendered as an item view.
    Product(Box<Product>),
    /// A taxonomy entity; rendered as a listing seeded by the node.
    Node(TaxonomyNode),
    /// An entity whose type tag was missing or unrecognized. Fails open to
    /// a generic listing instead of erroring the page; logged so upstream
    /// data bugs stay visible.
    Fallback(EntityStub),
}

/// Classify one lookup payload by its (case-folded) type tag.
pub(crate) fn classify(payload: Value) -> Result<Resolution, CatalogError> {
    let tag = payload
        .get("type")
        .and_then(Value::as_str)
        .map(|t| t.trim().to_ascii_lowercase());

    match tag.as_deref() {
        Some("product") => Ok(Resolution::Product(Box::new(serde_json::from_value(
            payload,
        )?))),
        Some("category") => Ok(Resolution::Node(TaxonomyNode::Category(
            serde_json::from_value(payload)?,
        ))),
        Some("brand") => Ok(Resolution::Node(TaxonomyNode::Brand(
            serde_json::from_value(payload)?,
        ))),
        Some("subcategory") => Ok(Resolution::Node(TaxonomyNode::Subcategory(
            serde_json::from_value(payload)?,
        ))),
        other => {
            // Fail open: an unrecognized tag on an otherwise valid entity
            // becomes a generic listing, not an error page.
            let tag = other.map(str::to_owned);
            let stub: EntityStub = serde_json::from_value(payload)?;
            warn!(
                tag = tag.as_deref().unwrap_or("<missing>"),
                slug = %stub.slug,
                "unrecognized entity type tag; treating as generic listing"
            );
            Ok(Resolution::Fallback(stub))
        }
    }
}
