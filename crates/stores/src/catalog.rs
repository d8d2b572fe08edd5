//! Cached product catalogue.
//!
//! A session-owned cache of the normalized product list, built on `moka`
//! (5-minute TTL). Whoever constructs the [`Catalog`] owns its lifecycle and
//! can drop stale data through `invalidate`/`clear`; there are no
//! module-level statics.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use modora_core::{CategoryId, Product};

use crate::remote::{ProductApi, RemoteError};

const PRODUCTS_KEY: &str = "products";
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cached view over the remote product catalogue.
///
/// Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct Catalog {
    api: Arc<dyn ProductApi>,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl Catalog {
    /// Create a catalogue over the given product service.
    #[must_use]
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(CACHE_TTL)
            .build();
        Self { api, cache }
    }

    /// The product list, served from cache within the TTL.
    ///
    /// # Errors
    ///
    /// Returns the remote error when the cache is cold and the fetch fails;
    /// nothing is cached in that case.
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, RemoteError> {
        if let Some(products) = self.cache.get(PRODUCTS_KEY).await {
            debug!("cache hit for product list");
            return Ok(products);
        }

        let products = Arc::new(self.api.fetch_products().await?);
        self.cache.insert(PRODUCTS_KEY, Arc::clone(&products)).await;
        Ok(products)
    }

    /// Products in one category.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::products`].
    pub async fn by_category(&self, category: &CategoryId) -> Result<Vec<Product>, RemoteError> {
        let products = self.products().await?;
        Ok(products
            .iter()
            .filter(|product| product.category.as_ref() == Some(category))
            .cloned()
            .collect())
    }

    /// Drop the cached product list so the next read refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate(PRODUCTS_KEY).await;
    }

    /// Drop everything cached.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use modora_core::{Price, ProductId};

    use super::*;

    #[derive(Default)]
    struct CountingApi {
        fetches: AtomicUsize,
    }

    fn product(id: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::parse("10").unwrap(),
            image_refs: vec![],
            category: Some(CategoryId::new(category)),
            sizes: vec![],
            is_favorite: false,
            is_new: false,
            is_best_seller: false,
            quantity: None,
        }
    }

    #[async_trait]
    impl ProductApi for CountingApi {
        async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![product("P1", "C1"), product("P2", "C2")])
        }

        async fn set_favorite(&self, _: &ProductId, _: bool) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_products_served_from_cache() {
        let api = Arc::new(CountingApi::default());
        let catalog = Catalog::new(Arc::clone(&api) as Arc<dyn ProductApi>);

        let first = catalog.products().await.unwrap();
        let second = catalog.products().await.unwrap();

        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let api = Arc::new(CountingApi::default());
        let catalog = Catalog::new(Arc::clone(&api) as Arc<dyn ProductApi>);

        catalog.products().await.unwrap();
        catalog.invalidate().await;
        catalog.products().await.unwrap();

        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_by_category_filters() {
        let api = Arc::new(CountingApi::default());
        let catalog = Catalog::new(api as Arc<dyn ProductApi>);

        let in_c1 = catalog.by_category(&CategoryId::new("C1")).await.unwrap();

        assert_eq!(in_c1.len(), 1);
        assert_eq!(
            in_c1.first().unwrap().id,
            ProductId::new("P1")
        );
    }
}
