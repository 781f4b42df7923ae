//! PostgreSQL connection management shared by the inventory services.
//!
//! - [`postgres`]: pool configuration from the environment, connecting with
//!   retry, health checks
//! - [`common`]: retry with exponential backoff and the crate error type
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
