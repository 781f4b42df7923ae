//! Inventory Domain
//!
//! Products, their ratings and the rules around them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, JSON envelope, token check
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← filter parsing, not-found mapping, rating aggregation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← validation on write, parameterized SQL
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Query    │  ← filter map → predicate + bound values
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! # async fn example(db: sea_orm::DatabaseConnection) {
//! use std::sync::Arc;
//! use domain_inventory::{
//!     handlers, PgProductRepository, PgRatingRepository, ProductService, RatingService,
//! };
//!
//! let ratings = Arc::new(RatingService::new(PgRatingRepository::new(db.clone())));
//! let products = ProductService::new(PgProductRepository::new(db), ratings);
//!
//! let router = handlers::router(products);
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod logger;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{InventoryError, InventoryResult};
pub use logger::{NoopLogger, ServiceLogger, TracingLogger};
pub use models::{
    Product, ProductChanges, ProductPage, ProductPatch, ProductView, RateProduct, Rating,
};
pub use postgres::{PRODUCTS_TABLE, PgProductRepository, PgRatingRepository, RATINGS_TABLE};
pub use query::{FilterQuery, FilterValue, Predicate};
pub use repository::{ProductRepository, RatingField, RatingRepository};
pub use service::{FilterParams, ProductService, RatingService};
pub use validation::ValidationError;
