//! In-memory taxonomy index and priority-ordered navigation.
//!
//! The index is built in one pass from batched listing fetches, keyed by
//! category id, instead of issuing one subcategory lookup per category.

use std::collections::HashMap;

use ironvale_core::{
    Brand, Category, CategoryId, PriorityEntry, Subcategory, SubcategoryId, TargetKind,
    TaxonomyNode,
};

use crate::catalog::{CatalogClient, CatalogError};

/// Read-mostly cache of the catalog taxonomy: the Category→Subcategory
/// relation, brand listing, and navigation priority levels.
#[derive(Debug, Default)]
pub struct TaxonomyIndex {
    categories: Vec<Category>,
    brands: Vec<Brand>,
    subcategories: HashMap<CategoryId, Vec<Subcategory>>,
    priorities: HashMap<(TargetKind, String), i64>,
}

impl TaxonomyIndex {
    /// Build the index with one batched fetch per listing endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if any listing fetch fails.
    pub async fn load(client: &CatalogClient) -> Result<Self, CatalogError> {
        let (categories, subcategories, brands, entries) = tokio::try_join!(
            client.categories(),
            client.subcategories(),
            client.brands(),
            client.priority_entries(),
        )?;
        Ok(Self::from_parts(categories, subcategories, brands, &entries))
    }

    /// Assemble the index in one pass over already-fetched listings.
    #[must_use]
    pub fn from_parts(
        categories: Vec<Category>,
        subcategories: Vec<Subcategory>,
        brands: Vec<Brand>,
        entries: &[PriorityEntry],
    ) -> Self {
        let mut grouped: HashMap<CategoryId, Vec<Subcategory>> = HashMap::new();
        for sub in subcategories {
            grouped.entry(sub.category.clone()).or_default().push(sub);
        }

        // Duplicate (kind, id) pairs are tolerated; the last entry wins.
        let mut priorities = HashMap::new();
        for entry in entries {
            priorities.insert(
                (entry.target_type, entry.target_id.clone()),
                entry.level(),
            );
        }

        Self {
            categories,
            brands,
            subcategories: grouped,
            priorities,
        }
    }

    /// All known categories, in fetch order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All known brands, in fetch order.
    #[must_use]
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    /// The subcategories of one category, in fetch order.
    #[must_use]
    pub fn subcategories_of(&self, category: &CategoryId) -> &[Subcategory] {
        self.subcategories.get(category).map_or(&[], Vec::as_slice)
    }

    /// Whether `sub` belongs to `category` in the current index.
    #[must_use]
    pub fn contains_subcategory(&self, category: &CategoryId, sub: &SubcategoryId) -> bool {
        self.subcategories_of(category)
            .iter()
            .any(|s| &s.id == sub)
    }

    /// Replace one category's subcategory list.
    ///
    /// Results are applied keyed by the category id the request was issued
    /// for, never by arrival order: a slow earlier lookup can only ever
    /// touch its own entry, not clobber a newer one.
    pub fn apply_subcategories(&mut self, category: CategoryId, subcategories: Vec<Subcategory>) {
        self.subcategories.insert(category, subcategories);
    }

    /// Re-fetch one category's subcategory list from the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; the index keeps its previous
    /// entry in that case.
    pub async fn refresh_category(
        &mut self,
        client: &CatalogClient,
        category: &CategoryId,
    ) -> Result<(), CatalogError> {
        let subcategories = client.subcategories_of(category).await?;
        self.apply_subcategories(category.clone(), subcategories);
        Ok(())
    }

    /// The priority level for one entity; entities without an entry sort
    /// as level 0.
    fn level_of(&self, kind: TargetKind, id: &str) -> i64 {
        self.priorities
            .get(&(kind, id.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    /// Navigation listing for one kind, sorted by priority level
    /// descending.
    ///
    /// Ties preserve the fetch order (the sort is stable), so repeated
    /// calls over the same input set are deterministic.
    #[must_use]
    pub fn ordered_nav(&self, kind: TargetKind) -> Vec<TaxonomyNode> {
        let mut nodes: Vec<TaxonomyNode> = match kind {
            TargetKind::Category => self
                .categories
                .iter()
                .cloned()
                .map(TaxonomyNode::Category)
                .collect(),
            TargetKind::Brand => self
                .brands
                .iter()
                .cloned()
                .map(TaxonomyNode::Brand)
                .collect(),
            // Flatten per-category lists in category fetch order so the
            // tie-break order stays deterministic.
            TargetKind::Subcategory => self
                .categories
                .iter()
                .flat_map(|c| self.subcategories_of(&c.id).iter().cloned())
                .map(TaxonomyNode::Subcategory)
                .collect(),
        };

        nodes.sort_by_key(|node| std::cmp::Reverse(self.level_of(node.kind(), node.id())));
        nodes
    }
}
