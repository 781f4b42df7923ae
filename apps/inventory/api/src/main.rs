use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    let state = AppState { config, db };

    let app = build_app(&state)?;

    info!(
        products_table = %state.config.products_table,
        ratings_table = %state.config.ratings_table,
        "Starting inventory API"
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Inventory API shutdown complete");
    Ok(())
}

/// API routes under `/api`, docs, and `/health` + `/ready` at the root and
/// under `/api/v1/system`.
fn build_app(state: &AppState) -> eyre::Result<axum::Router> {
    let router =
        axum_helpers::create_router::<openapi::ApiDoc>(api::routes(state), &state.config.server)?;

    Ok(router.merge(api::system_router(state)))
}
