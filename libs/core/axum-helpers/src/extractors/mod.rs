//! Request extractors that reject with [`AppError`](crate::errors::AppError) bodies.

pub mod json;

pub use json::JsonBody;
