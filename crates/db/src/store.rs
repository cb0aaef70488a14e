//! PostgreSQL implementation of the migration store.

use async_trait::async_trait;
use migrun_core::{MigrationRecord, MigrationStore};
use migrun_shared::{DatabaseConfig, MigrationError, MigrationResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};

use crate::entities::migrations;

/// DDL for the tracking table.
pub const TRACKING_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS migrations (
    id SERIAL PRIMARY KEY,
    filename VARCHAR(255) NOT NULL UNIQUE,
    executed_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

/// Tracking store backed by a `SeaORM` connection.
///
/// Owns the connection for the duration of a run; call [`Self::close`] when
/// done.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    db: DatabaseConnection,
}

impl PostgresStore {
    /// Wraps an existing connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a connection using the `[database]` configuration.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Connection` if the database is unreachable.
    pub async fn connect(config: &DatabaseConfig) -> MigrationResult<Self> {
        let db = crate::connect(config)
            .await
            .map_err(|e| MigrationError::Connection(e.to_string()))?;
        info!("Connected to database");
        Ok(Self::new(db))
    }

    /// Closes the connection pool.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Connection` if the pool fails to shut down.
    pub async fn close(self) -> MigrationResult<()> {
        self.db
            .close()
            .await
            .map_err(|e| MigrationError::Connection(e.to_string()))?;
        debug!("Database connection closed");
        Ok(())
    }
}

#[async_trait]
impl MigrationStore for PostgresStore {
    async fn ensure_tracking_table(&self) -> MigrationResult<()> {
        self.db
            .execute_unprepared(TRACKING_TABLE_SQL)
            .await
            .map_err(|e| MigrationError::TrackingTable(e.to_string()))?;
        Ok(())
    }

    async fn is_executed(&self, filename: &str) -> MigrationResult<bool> {
        let record = migrations::Entity::find()
            .filter(migrations::Column::Filename.eq(filename))
            .one(&self.db)
            .await
            .map_err(|e| MigrationError::Query(e.to_string()))?;
        Ok(record.is_some())
    }

    async fn mark_executed(&self, filename: &str) -> MigrationResult<()> {
        let record = migrations::ActiveModel {
            id: NotSet,
            filename: Set(filename.to_string()),
            executed_at: NotSet,
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| MigrationError::record(filename, e))?;
        Ok(())
    }

    async fn execute_batch(&self, filename: &str, sql: &str) -> MigrationResult<()> {
        // Unprepared statements go through the simple query protocol, which
        // accepts several statements in one string.
        self.db
            .execute_unprepared(sql)
            .await
            .map_err(|e| MigrationError::execution(filename, e))?;
        Ok(())
    }

    async fn executed(&self) -> MigrationResult<Vec<MigrationRecord>> {
        let records = migrations::Entity::find()
            .order_by_asc(migrations::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| MigrationError::Query(e.to_string()))?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}
