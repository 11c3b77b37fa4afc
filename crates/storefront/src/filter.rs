//! Facet filter state and catalog query construction.
//!
//! `FilterState` is the single source of truth for what the product listing
//! shows. It is transient: created when a listing page mounts, dropped on
//! navigation away, never persisted.

use ironvale_core::{BrandId, CategoryId, SubcategoryId, TaxonomyNode};
use tracing::warn;

use crate::taxonomy::TaxonomyIndex;

/// Server-side sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Recency (creation timestamp).
    #[default]
    CreatedAt,
    /// Effective price.
    Price,
    /// Display name.
    Name,
}

impl SortBy {
    /// Wire-format name of the sort field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Price => "price",
            Self::Name => "name",
        }
    }

    /// Parse a sort field, defaulting unknown inputs to recency.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "price" => Self::Price,
            "name" => Self::Name,
            _ => Self::CreatedAt,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire-format name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// The current facet selection plus sort. All facets default to empty,
/// meaning "no constraint"; sort defaults to recency descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    brand: Option<BrandId>,
    category: Option<CategoryId>,
    sub_category: Option<SubcategoryId>,
    sort_by: SortBy,
    sort_order: SortOrder,
}

impl FilterState {
    /// Create an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected brand facet.
    #[must_use]
    pub const fn brand(&self) -> Option<&BrandId> {
        self.brand.as_ref()
    }

    /// The selected category facet.
    #[must_use]
    pub const fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }

    /// The selected subcategory facet.
    #[must_use]
    pub const fn sub_category(&self) -> Option<&SubcategoryId> {
        self.sub_category.as_ref()
    }

    /// The current sort.
    #[must_use]
    pub const fn sort(&self) -> (SortBy, SortOrder) {
        (self.sort_by, self.sort_order)
    }

    /// Select or clear the category facet.
    ///
    /// Always drops the subcategory: one from the prior category is never
    /// valid under the new one. The caller is expected to re-fetch the new
    /// category's subcategory list.
    pub fn set_category(&mut self, category: Option<CategoryId>) {
        self.category = category;
        self.sub_category = None;
    }

    /// Select or clear the brand facet. Brand is an independent facet;
    /// category and subcategory are untouched.
    pub fn set_brand(&mut self, brand: Option<BrandId>) {
        self.brand = brand;
    }

    /// Select or clear the subcategory facet.
    pub fn set_sub_category(&mut self, sub_category: Option<SubcategoryId>) {
        self.sub_category = sub_category;
    }

    /// Set the sort field and direction.
    pub fn set_sort(&mut self, sort_by: SortBy, sort_order: SortOrder) {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
    }

    /// Seed the facets from a resolved taxonomy node.
    ///
    /// A subcategory seed also sets its parent category, so the selection
    /// is always internally consistent.
    pub fn apply_seed(&mut self, node: &TaxonomyNode) {
        match node {
            TaxonomyNode::Category(category) => {
                self.category = Some(category.id.clone());
                self.sub_category = None;
            }
            TaxonomyNode::Brand(brand) => {
                self.brand = Some(brand.id.clone());
            }
            TaxonomyNode::Subcategory(sub) => {
                self.category = Some(sub.category.clone());
                self.sub_category = Some(sub.id.clone());
            }
        }
    }

    /// Clear a subcategory that does not belong to the selected category.
    ///
    /// Invalid selections arriving from stale or external sources are
    /// cleared, never rejected as an error.
    pub fn validate(&mut self, taxonomy: &TaxonomyIndex) {
        if let Some(sub) = &self.sub_category {
            let valid = self
                .category
                .as_ref()
                .is_some_and(|category| taxonomy.contains_subcategory(category, sub));
            if !valid {
                warn!(
                    sub_category = %sub,
                    "clearing subcategory facet outside the selected category"
                );
                self.sub_category = None;
            }
        }
    }

    /// Clear every facet, falling back to the all-products listing. Sort is
    /// kept.
    pub fn reset_facets(&mut self) {
        self.brand = None;
        self.category = None;
        self.sub_category = None;
    }

    /// Whether no facet constrains the listing.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.brand.is_none() && self.category.is_none() && self.sub_category.is_none()
    }

    /// Query parameters for the products endpoint. Empty facets are
    /// stripped entirely, never sent as an explicit "match nothing".
    #[must_use]
    pub fn query(&self, limit: Option<u32>) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(brand) = &self.brand {
            params.push(("brand", brand.to_string()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(sub) = &self.sub_category {
            params.push(("subCategory", sub.to_string()));
        }
        params.push(("sortBy", self.sort_by.as_str().to_owned()));
        params.push(("sortOrder", self.sort_order.as_str().to_owned()));
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}
