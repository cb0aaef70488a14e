//! PostgreSQL layer for Migrun.
//!
//! This crate provides:
//! - The `SeaORM` entity for the tracking table
//! - `PostgresStore`, the database-backed `MigrationStore`
//! - `run_migrations` / `migration_status`, embeddable entry points that own
//!   the connection for one run

pub mod entities;
pub mod migrate;
pub mod store;

pub use migrate::{migration_status, run_migrations, run_migrations_on};
pub use store::PostgresStore;

use std::time::Duration;

use migrun_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    Database::connect(options).await
}
