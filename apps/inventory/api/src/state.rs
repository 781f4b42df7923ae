//! Shared application state.

/// Cloned into the routers that need it; the connection pool is an `Arc`
/// internally, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
}
