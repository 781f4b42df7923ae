//! # Axum Helpers
//!
//! Shared HTTP plumbing for the inventory services.
//!
//! - **[`errors`]**: [`AppError`] and the JSON error body
//! - **[`extractors`]**: [`JsonBody`], a JSON extractor rejecting with [`AppError`]
//! - **[`middleware`]**: Authorization header check for write routes
//! - **[`pagination`]**: `skip`/`limit` parsing, [`Pager`] and the `{data, meta}` envelope
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod pagination;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::JsonBody;
pub use middleware::require_authorization;
pub use pagination::{ApiResponse, DEFAULT_LIMIT, PageParams, Pager};
pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
