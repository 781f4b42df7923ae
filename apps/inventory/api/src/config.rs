use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_inventory::{PRODUCTS_TABLE, RATINGS_TABLE};

pub use core_config::Environment;

/// Application configuration, composed from the shared config pieces
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// `PRODUCTS_TABLE`, default `products`
    pub products_table: String,
    /// `RATINGS_TABLE`, default `ratings`
    pub ratings_table: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            products_table: env_or_default("PRODUCTS_TABLE", PRODUCTS_TABLE),
            ratings_table: env_or_default("RATINGS_TABLE", RATINGS_TABLE),
        })
    }
}
