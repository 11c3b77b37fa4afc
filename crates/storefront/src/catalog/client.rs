//! HTTP client for the catalog lookup service.

use std::sync::Arc;
use std::time::Duration;

use ironvale_core::{Brand, Category, CategoryId, PriorityEntry, Product, Subcategory};
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogConfig;

use super::CatalogError;
use super::cache::CacheValue;
use super::resolve::{self, Resolution};

/// The products endpoint answers with either a wrapped object or a bare
/// array depending on the service version; both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductsPayload {
    Wrapped { products: Vec<Product> },
    Bare(Vec<Product>),
}

impl ProductsPayload {
    fn into_vec(self) -> Vec<Product> {
        match self {
            Self::Wrapped { products } | Self::Bare(products) => products,
        }
    }
}

/// Priority entries arrive wrapped in a `data` envelope.
#[derive(Debug, Deserialize)]
struct PriorityPayload {
    #[serde(default)]
    data: Vec<PriorityEntry>,
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog lookup service.
///
/// Provides typed access to slug resolution, product listings, taxonomy
/// listings, and priority entries. Read-mostly responses are cached.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
    timeout: Duration,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                access_token: config
                    .access_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_owned()),
                timeout: config.timeout,
                cache,
            }),
        }
    }

    /// Build a service URL from path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        // Config guarantees the base URL can carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issue one GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let mut request = self.inner.http.get(url.clone()).timeout(self.inner.timeout);
        if let Some(token) = &self.inner.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_owned()));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "catalog service returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Slug Resolution
    // =========================================================================

    /// Resolve one slug from the flat namespace shared by all entity kinds.
    ///
    /// Issues exactly one lookup call; retry policy belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` when the slug names nothing, or a
    /// transient variant when the lookup itself failed.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn resolve(&self, slug: &str) -> Result<Resolution, CatalogError> {
        let cache_key = format!("item:{slug}");

        // Check cache
        if let Some(CacheValue::Resolution(hit)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for slug");
            return Ok(*hit);
        }

        let payload: serde_json::Value = self
            .get(self.endpoint(&["item", slug]))
            .await
            .map_err(|e| match e {
                CatalogError::NotFound(_) => CatalogError::NotFound(slug.to_owned()),
                other => other,
            })?;

        let resolution = resolve::classify(payload)?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Resolution(Box::new(resolution.clone())))
            .await;

        Ok(resolution)
    }

    // =========================================================================
    // Product Listings
    // =========================================================================

    /// List products under the given query parameters.
    ///
    /// Only unfiltered listings are cached; faceted queries always go to
    /// the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, params))]
    pub async fn products(&self, params: &[(&str, String)]) -> Result<Vec<Product>, CatalogError> {
        let faceted = params
            .iter()
            .any(|(key, _)| matches!(*key, "brand" | "category" | "subCategory"));
        let cache_key = format!(
            "products:{}",
            params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("&")
        );

        // Check cache (only for unfiltered listings)
        if !faceted
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut url = self.endpoint(&["products"]);
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));

        let payload: ProductsPayload = self.get(url).await?;
        let products = payload.into_vec();

        if !faceted {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    // =========================================================================
    // Taxonomy Listings
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        const KEY: &str = "categories";

        if let Some(CacheValue::Categories(hit)) = self.inner.cache.get(KEY).await {
            debug!("Cache hit for categories");
            return Ok(hit);
        }

        let categories: Vec<Category> = self.get(self.endpoint(&["category"])).await?;
        self.inner
            .cache
            .insert(KEY.to_owned(), CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// List all subcategories across every category, for the one-pass
    /// index build.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn subcategories(&self) -> Result<Vec<Subcategory>, CatalogError> {
        const KEY: &str = "subcategories";

        if let Some(CacheValue::Subcategories(hit)) = self.inner.cache.get(KEY).await {
            debug!("Cache hit for subcategories");
            return Ok(hit);
        }

        let subcategories: Vec<Subcategory> = self.get(self.endpoint(&["subcategory"])).await?;
        self.inner
            .cache
            .insert(
                KEY.to_owned(),
                CacheValue::Subcategories(subcategories.clone()),
            )
            .await;

        Ok(subcategories)
    }

    /// List one category's subcategories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn subcategories_of(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<Subcategory>, CatalogError> {
        let cache_key = format!("subcategories:{category}");

        if let Some(CacheValue::Subcategories(hit)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category subcategories");
            return Ok(hit);
        }

        let subcategories: Vec<Subcategory> = self
            .get(self.endpoint(&["category", category.as_str(), "subcategories"]))
            .await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Subcategories(subcategories.clone()))
            .await;

        Ok(subcategories)
    }

    /// List all brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, CatalogError> {
        const KEY: &str = "brands";

        if let Some(CacheValue::Brands(hit)) = self.inner.cache.get(KEY).await {
            debug!("Cache hit for brands");
            return Ok(hit);
        }

        let brands: Vec<Brand> = self.get(self.endpoint(&["brand"])).await?;
        self.inner
            .cache
            .insert(KEY.to_owned(), CacheValue::Brands(brands.clone()))
            .await;

        Ok(brands)
    }

    /// List navigation priority entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn priority_entries(&self) -> Result<Vec<PriorityEntry>, CatalogError> {
        const KEY: &str = "priorities";

        if let Some(CacheValue::Priorities(hit)) = self.inner.cache.get(KEY).await {
            debug!("Cache hit for priority entries");
            return Ok(hit);
        }

        let payload: PriorityPayload = self.get(self.endpoint(&["p"])).await?;
        self.inner
            .cache
            .insert(KEY.to_owned(), CacheValue::Priorities(payload.data.clone()))
            .await;

        Ok(payload.data)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_products_payload_wrapped() {
        let json = r#"{"products": [{"id": "P1", "name": "Relay", "slug": "relay", "price": "12.50"}]}"#;
        let payload: ProductsPayload = serde_json::from_str(json).unwrap();
        let products = payload.into_vec();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "P1");
    }

    #[test]
    fn test_products_payload_bare_array() {
        let json = r#"[{"id": "P1", "name": "Relay", "slug": "relay", "price": "12.50"}]"#;
        let payload: ProductsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.into_vec().len(), 1);
    }

    #[test]
    fn test_priority_payload_envelope() {
        let json = r#"{"data": [
            {"id": "e1", "targetType": "brand", "targetId": "B1", "displayName": "Acme", "level": 8}
        ]}"#;
        let payload: PriorityPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.data[0].level(), 8);
    }

    #[test]
    fn test_priority_payload_missing_data() {
        let payload: PriorityPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.data.is_empty());
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let config = CatalogConfig::new("https://catalog.ironvale.dev/api").unwrap();
        let client = CatalogClient::new(&config);
        let url = client.endpoint(&["item", "industrial-sensors"]);
        assert_eq!(url.path(), "/api/item/industrial-sensors");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transient() {
        let config = CatalogConfig::new("http://127.0.0.1:1").unwrap();
        let client = CatalogClient::new(&config);

        let err = client.resolve("anything").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let config = CatalogConfig::new("https://catalog.ironvale.dev").unwrap();
        let client = CatalogClient::new(&config);
        let url = client.endpoint(&["item", "50% off"]);
        assert_eq!(url.path(), "/item/50%25%20off");
    }
}
