use axum::Router;
use axum_helpers::server::health_router;

pub mod health;
pub mod products;

/// Mount point of the product routes below `/api`.
pub const PRODUCTS_PATH: &str = "/v1/products";

/// Mount point of `/health` and `/ready` below `/api`; they are also served at the root.
pub const SYSTEM_PATH: &str = "/v1/system";

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest(PRODUCTS_PATH, products::router(state))
        .nest(SYSTEM_PATH, system_router(state))
}

/// `/health` and `/ready` with their state applied.
pub fn system_router(state: &crate::state::AppState) -> Router {
    health_router(state.config.app).merge(ready_router(state.clone()))
}

/// Creates a router with the /ready endpoint that pings the database.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
