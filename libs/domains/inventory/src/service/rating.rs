use std::sync::Arc;
use tracing::instrument;

use crate::error::InventoryResult;
use crate::logger::{NoopLogger, ServiceLogger};
use crate::models::Rating;
use crate::query::FilterQuery;
use crate::repository::{RatingField, RatingRepository};

pub struct RatingService<R: RatingRepository> {
    repository: Arc<R>,
    logger: Arc<dyn ServiceLogger>,
}

impl<R: RatingRepository> RatingService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            logger: Arc::new(NoopLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ServiceLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Validates and stores a rating; returns its id.
    #[instrument(skip(self, rating), fields(product_id = %rating.product_id))]
    pub async fn add(&self, rating: Rating) -> InventoryResult<String> {
        let product_id = rating.product_id.clone();
        self.logger
            .info(&format!("creating rating for product {product_id}"));

        let id = self.repository.create(rating).await.inspect_err(|e| {
            self.logger.error(&format!(
                "failed to create rating for product {product_id}: {e}"
            ))
        })?;

        self.logger.info(&format!("created rating {id}"));
        Ok(id)
    }

    /// Mean rating of a product; 0 when it has none.
    #[instrument(skip(self))]
    pub async fn avg_rating(&self, product_id: &str) -> InventoryResult<f64> {
        self.logger
            .info(&format!("averaging ratings of product {product_id}"));

        let query = FilterQuery::new().with("product_id", product_id);
        let avg = self
            .repository
            .avg(&query, RatingField::Value)
            .await
            .inspect_err(|e| {
                self.logger.error(&format!(
                    "failed to average ratings of product {product_id}: {e}"
                ))
            })?;

        self.logger
            .info(&format!("average rating of product {product_id} is {avg}"));
        Ok(avg)
    }
}
