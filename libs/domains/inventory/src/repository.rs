use async_trait::async_trait;

use crate::error::InventoryResult;
use crate::models::{Product, Rating};
use crate::query::FilterQuery;

/// Product persistence.
///
/// Reads only see rows that are not soft-deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Assigns a fresh id, validates and inserts. Returns the new id.
    async fn create(&self, product: Product) -> InventoryResult<String>;

    /// `None` when no live row has this id.
    async fn fetch(&self, id: &str) -> InventoryResult<Option<Product>>;

    /// Validates and overwrites the mutable fields. An unknown id is a no-op.
    async fn update(&self, id: &str, product: Product) -> InventoryResult<()>;

    /// Soft-deletes the row. An unknown or already deleted id is a no-op.
    async fn delete(&self, id: &str) -> InventoryResult<()>;

    /// Oldest first.
    async fn list(&self, skip: u64, limit: u64) -> InventoryResult<Vec<Product>>;

    async fn count(&self) -> InventoryResult<u64>;

    async fn search(
        &self,
        query: &FilterQuery,
        skip: u64,
        limit: u64,
    ) -> InventoryResult<Vec<Product>>;

    async fn search_count(&self, query: &FilterQuery) -> InventoryResult<u64>;
}

/// Column of the ratings table that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingField {
    Value,
}

impl RatingField {
    pub fn column(self) -> &'static str {
        match self {
            RatingField::Value => "value",
        }
    }
}

/// Rating persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Assigns a fresh id, validates and inserts. Returns the new id.
    async fn create(&self, rating: Rating) -> InventoryResult<String>;

    /// Mean of `field` over matching rows; 0 when nothing matches.
    async fn avg(&self, query: &FilterQuery, field: RatingField) -> InventoryResult<f64>;
}
