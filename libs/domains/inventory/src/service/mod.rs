mod filter;
mod product;
mod rating;

pub use filter::{FilterParams, filter_params, product_filter};
pub use product::ProductService;
pub use rating::RatingService;
