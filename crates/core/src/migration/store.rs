//! Storage seam between the runner and a database backend.

use async_trait::async_trait;
use migrun_shared::MigrationResult;

use super::types::MigrationRecord;

/// Tracking table and SQL execution used by the runner.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Creates the tracking table if it does not exist.
    async fn ensure_tracking_table(&self) -> MigrationResult<()>;

    /// Whether `filename` has a tracking record.
    async fn is_executed(&self, filename: &str) -> MigrationResult<bool>;

    /// Inserts a tracking record for `filename`.
    ///
    /// Fails with `MigrationError::Record` if the name is already recorded.
    async fn mark_executed(&self, filename: &str) -> MigrationResult<()>;

    /// Runs `sql` as a single multi-statement batch.
    ///
    /// Fails with `MigrationError::Execution` naming `filename`.
    async fn execute_batch(&self, filename: &str, sql: &str) -> MigrationResult<()>;

    /// All tracking records ordered by id.
    async fn executed(&self) -> MigrationResult<Vec<MigrationRecord>>;
}
