use axum::Router;
use domain_inventory::{
    PgProductRepository, PgRatingRepository, ProductService, RatingService, TracingLogger,
    handlers,
};
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let ratings = PgRatingRepository::new(state.db.clone())
        .with_table(state.config.ratings_table.clone());
    let rating_service = Arc::new(
        RatingService::new(ratings).with_logger(Arc::new(TracingLogger::new("ratings"))),
    );

    let products = PgProductRepository::new(state.db.clone())
        .with_table(state.config.products_table.clone());
    let service = ProductService::new(products, rating_service)
        .with_logger(Arc::new(TracingLogger::new("products")));

    handlers::router(service)
}
