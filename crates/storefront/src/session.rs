//! Session-scoped storefront state.
//!
//! One [`StorefrontSession`] is constructed per browsing session and owns
//! the catalog client, taxonomy index, filter state, and cart. It replaces
//! module-level mutable state with an explicitly owned object: construction
//! is session start, teardown is drop.

use ironvale_core::{BrandId, CategoryId, Product, SubcategoryId, TaxonomyNode};
use tracing::{instrument, warn};

use crate::cart::CartSession;
use crate::cart::store::CartStore;
use crate::catalog::{CatalogClient, Resolution};
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::filter::{FilterState, SortBy, SortOrder};
use crate::taxonomy::TaxonomyIndex;

/// Products fetched per listing page.
const PRODUCTS_PER_PAGE: u32 = 12;

/// What a navigation landed on.
#[derive(Debug, Clone)]
pub enum PageView {
    /// A single product page.
    Item(Box<Product>),
    /// A (possibly filtered) product listing.
    Listing(Vec<Product>),
}

/// Per-session storefront state: client, taxonomy, filter, and cart.
pub struct StorefrontSession {
    client: CatalogClient,
    taxonomy: TaxonomyIndex,
    filter: FilterState,
    cart: CartSession,
}

impl StorefrontSession {
    /// Start a session: build the taxonomy index with batched fetches and
    /// restore the cart from the backend list.
    ///
    /// # Errors
    ///
    /// Returns an error if the taxonomy listings cannot be fetched.
    pub async fn start(config: &CatalogConfig, stores: Vec<Box<dyn CartStore>>) -> Result<Self> {
        let client = CatalogClient::new(config);
        let taxonomy = TaxonomyIndex::load(&client).await?;
        let cart = CartSession::load(stores);

        Ok(Self {
            client,
            taxonomy,
            filter: FilterState::new(),
            cart,
        })
    }

    /// Navigate to a slug.
    ///
    /// Products land on an item page. Taxonomy nodes seed the facet filter
    /// and land on a listing. An entity with an unrecognized type tag falls
    /// open to an unfiltered listing instead of erroring the page.
    ///
    /// # Errors
    ///
    /// Returns a terminal error for unknown slugs and a transient one when
    /// a lookup failed; callers can tell them apart via
    /// [`crate::Error::is_transient`].
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn navigate(&mut self, slug: &str) -> Result<PageView> {
        match self.client.resolve(slug).await? {
            Resolution::Product(product) => Ok(PageView::Item(product)),
            Resolution::Node(node) => {
                self.filter.apply_seed(&node);
                if matches!(
                    node,
                    TaxonomyNode::Category(_) | TaxonomyNode::Subcategory(_)
                ) && let Some(category) = self.filter.category().cloned()
                {
                    self.taxonomy
                        .refresh_category(&self.client, &category)
                        .await?;
                }
                self.filter.validate(&self.taxonomy);
                self.listing().await
            }
            Resolution::Fallback(stub) => {
                warn!(slug = %stub.slug, "rendering generic listing for entity of unknown kind");
                self.filter.reset_facets();
                self.listing().await
            }
        }
    }

    /// Select or clear the category facet, re-fetch its subcategory list,
    /// and re-query the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog lookup fails.
    pub async fn select_category(&mut self, category: Option<CategoryId>) -> Result<Vec<Product>> {
        self.filter.set_category(category);
        if let Some(category) = self.filter.category().cloned() {
            self.taxonomy
                .refresh_category(&self.client, &category)
                .await?;
        }
        self.filter.validate(&self.taxonomy);
        self.products().await
    }

    /// Select or clear the brand facet and re-query the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the product query fails.
    pub async fn select_brand(&mut self, brand: Option<BrandId>) -> Result<Vec<Product>> {
        self.filter.set_brand(brand);
        self.products().await
    }

    /// Select or clear the subcategory facet and re-query the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the product query fails.
    pub async fn select_sub_category(
        &mut self,
        sub_category: Option<SubcategoryId>,
    ) -> Result<Vec<Product>> {
        self.filter.set_sub_category(sub_category);
        self.filter.validate(&self.taxonomy);
        self.products().await
    }

    /// Change the sort and re-query the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the product query fails.
    pub async fn set_sort(
        &mut self,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<Product>> {
        self.filter.set_sort(sort_by, sort_order);
        self.products().await
    }

    /// The current facet filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The taxonomy index.
    #[must_use]
    pub const fn taxonomy(&self) -> &TaxonomyIndex {
        &self.taxonomy
    }

    /// The cart, read-only.
    #[must_use]
    pub const fn cart(&self) -> &CartSession {
        &self.cart
    }

    /// The cart, for mutations.
    pub const fn cart_mut(&mut self) -> &mut CartSession {
        &mut self.cart
    }

    /// The underlying catalog client.
    #[must_use]
    pub const fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Query products under the current filter.
    async fn products(&self) -> Result<Vec<Product>> {
        let products = self
            .client
            .products(&self.filter.query(Some(PRODUCTS_PER_PAGE)))
            .await?;
        Ok(products)
    }

    async fn listing(&self) -> Result<PageView> {
        Ok(PageView::Listing(self.products().await?))
    }
}
