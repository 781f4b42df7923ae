use axum_helpers::Pager;
use std::sync::Arc;
use tracing::instrument;

use super::filter::{FilterParams, product_filter};
use super::rating::RatingService;
use crate::error::{InventoryError, InventoryResult};
use crate::logger::{NoopLogger, ServiceLogger};
use crate::models::{Product, ProductChanges, ProductPage, ProductPatch, ProductView, Rating};
use crate::repository::{ProductRepository, RatingRepository};

/// Product use cases. Ratings go through the shared [`RatingService`].
pub struct ProductService<P: ProductRepository, R: RatingRepository> {
    repository: Arc<P>,
    ratings: Arc<RatingService<R>>,
    logger: Arc<dyn ServiceLogger>,
}

impl<P: ProductRepository, R: RatingRepository> ProductService<P, R> {
    pub fn new(repository: P, ratings: Arc<RatingService<R>>) -> Self {
        Self {
            repository: Arc::new(repository),
            ratings,
            logger: Arc::new(NoopLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ServiceLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Stores a new product; returns the generated id.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn add(&self, product: Product) -> InventoryResult<String> {
        self.logger
            .info(&format!("creating product {}", product.name));

        let id = self.repository.create(product).await.inspect_err(|e| {
            self.logger
                .error(&format!("failed to create product: {e}"))
        })?;

        self.logger.info(&format!("created product {id}"));
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> InventoryResult<Product> {
        self.logger.info(&format!("fetching product {id}"));

        let product = self
            .repository
            .fetch(id)
            .await
            .inspect_err(|e| {
                self.logger
                    .error(&format!("failed to fetch product {id}: {e}"))
            })?
            .ok_or_else(|| {
                self.logger.error(&format!("product {id} not found"));
                InventoryError::NotFound("product")
            })?;

        self.logger.info(&format!("fetched product {id}"));
        Ok(product)
    }

    /// Persists `product` as the new state of `id`. An unknown id is a no-op.
    #[instrument(skip(self, product))]
    pub async fn update(&self, id: &str, product: Product) -> InventoryResult<()> {
        self.logger.info(&format!("updating product {id}"));

        self.repository.update(id, product).await.inspect_err(|e| {
            self.logger
                .error(&format!("failed to update product {id}: {e}"))
        })?;

        self.logger.info(&format!("updated product {id}"));
        Ok(())
    }

    /// Soft-deletes `id`. Removing twice succeeds.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> InventoryResult<()> {
        self.logger.info(&format!("deleting product {id}"));

        self.repository.delete(id).await.inspect_err(|e| {
            self.logger
                .error(&format!("failed to delete product {id}: {e}"))
        })?;

        self.logger.info(&format!("deleted product {id}"));
        Ok(())
    }

    /// Filtered listing; falls back to the plain listing when no filter parses.
    #[instrument(skip(self))]
    pub async fn find(
        &self,
        params: &FilterParams,
        skip: u64,
        limit: u64,
    ) -> InventoryResult<Vec<Product>> {
        self.logger
            .info(&format!("listing products {params:?} skip={skip} limit={limit}"));

        let query = product_filter(params);
        let result = if query.is_empty() {
            self.repository.list(skip, limit).await
        } else {
            self.repository.search(&query, skip, limit).await
        };

        let products = result.inspect_err(|e| {
            self.logger
                .error(&format!("failed to list products: {e}"))
        })?;

        self.logger
            .info(&format!("listed {} products", products.len()));
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn count(&self, params: &FilterParams) -> InventoryResult<u64> {
        self.logger.info(&format!("counting products {params:?}"));

        let query = product_filter(params);
        let result = if query.is_empty() {
            self.repository.count().await
        } else {
            self.repository.search_count(&query).await
        };

        let total = result.inspect_err(|e| {
            self.logger
                .error(&format!("failed to count products: {e}"))
        })?;

        self.logger.info(&format!("counted {total} products"));
        Ok(total)
    }

    /// Rates an existing product; returns the rating id.
    #[instrument(skip(self))]
    pub async fn rate(&self, id: &str, value: i32) -> InventoryResult<String> {
        let product = self.get(id).await?;
        self.ratings
            .add(Rating {
                product_id: product.id,
                value,
                ..Default::default()
            })
            .await
    }

    pub async fn avg_rating(&self, id: &str) -> InventoryResult<f64> {
        self.ratings.avg_rating(id).await
    }

    /// Product with its average rating.
    pub async fn view(&self, id: &str) -> InventoryResult<ProductView> {
        let product = self.get(id).await?;
        let avg = self.avg_rating(&product.id).await?;
        Ok(ProductView::new(product, avg))
    }

    /// Counts, then loads the page only when `skip` is before the end.
    #[instrument(skip(self))]
    pub async fn page(
        &self,
        params: &FilterParams,
        skip: u64,
        limit: u64,
    ) -> InventoryResult<ProductPage> {
        let total = self.count(params).await?;
        let pager = Pager::new(total, skip, limit);
        if pager.is_past_end() {
            return Ok(ProductPage {
                items: Vec::new(),
                pager,
            });
        }

        let products = self.find(params, skip, limit).await?;
        let mut items = Vec::with_capacity(products.len());
        for product in products {
            let avg = self.avg_rating(&product.id).await?;
            items.push(ProductView::new(product, avg));
        }

        Ok(ProductPage { items, pager })
    }

    /// Overwrites every mutable field of an existing product.
    ///
    /// Fetch and update are separate statements; a concurrent write between
    /// them is lost.
    pub async fn replace(&self, id: &str, changes: ProductChanges) -> InventoryResult<String> {
        let mut product = self.get(id).await?;
        changes.apply_to(&mut product);
        self.store(id, product).await
    }

    /// Overlays the present fields onto an existing product. Same race as
    /// [`replace`](Self::replace).
    pub async fn patch(&self, id: &str, patch: ProductPatch) -> InventoryResult<String> {
        let mut product = self.get(id).await?;
        patch.apply_to(&mut product);
        self.store(id, product).await
    }

    async fn store(&self, id: &str, product: Product) -> InventoryResult<String> {
        let product_id = product.id.clone();
        self.update(id, product).await?;
        Ok(product_id)
    }
}
