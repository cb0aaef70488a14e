//! Entry points that run migrations with a scoped connection.
//!
//! Each function acquires (or takes ownership of) a connection, does its
//! work, and closes the connection on every path before returning.

use migrun_core::{MigrationRunner, RunReport, StatusReport};
use migrun_shared::{AppConfig, MigrationResult, MigrationsConfig};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::store::PostgresStore;

/// Connects, applies all pending migrations, and closes the connection.
///
/// # Errors
///
/// Returns the connection error or the first fatal migration error. A failure
/// to close the connection afterwards is logged, not returned.
pub async fn run_migrations(config: &AppConfig) -> MigrationResult<RunReport> {
    let store = PostgresStore::connect(&config.database).await?;
    let result = MigrationRunner::from_config(&store, &config.migrations)
        .run_all()
        .await;
    release(store, result).await
}

/// Applies all pending migrations over an existing connection, then closes it.
///
/// # Errors
///
/// Same as [`run_migrations`], minus connecting.
pub async fn run_migrations_on(
    db: DatabaseConnection,
    migrations: &MigrationsConfig,
) -> MigrationResult<RunReport> {
    let store = PostgresStore::new(db);
    let result = MigrationRunner::from_config(&store, migrations)
        .run_all()
        .await;
    release(store, result).await
}

/// Connects, reports applied and pending migrations, and closes the connection.
///
/// # Errors
///
/// Returns the connection error or a tracking table or listing error.
pub async fn migration_status(config: &AppConfig) -> MigrationResult<StatusReport> {
    let store = PostgresStore::connect(&config.database).await?;
    let result = MigrationRunner::from_config(&store, &config.migrations)
        .status()
        .await;
    release(store, result).await
}

/// Closes the store and hands back the work result.
async fn release<T>(store: PostgresStore, result: MigrationResult<T>) -> MigrationResult<T> {
    settle(result, store.close().await)
}

/// A close failure is logged only; the run's own result decides the outcome.
fn settle<T>(result: MigrationResult<T>, closed: MigrationResult<()>) -> MigrationResult<T> {
    if let Err(close_err) = closed {
        warn!(error = %close_err, "Failed to close database connection");
    }
    result
}

#[cfg(test)]
mod tests {
    use migrun_core::{RunOutcome, RunReport};
    use migrun_shared::MigrationError;

    use super::*;

    #[test]
    fn test_close_failure_keeps_successful_report() {
        let report = RunReport::new(RunOutcome::Completed);
        let settled = settle(
            Ok(report.clone()),
            Err(MigrationError::Connection("pool timed out".into())),
        );
        assert_eq!(settled.unwrap(), report);
    }

    #[test]
    fn test_close_failure_keeps_run_error() {
        let settled: MigrationResult<RunReport> = settle(
            Err(MigrationError::execution("002_bad.sql", "syntax error")),
            Err(MigrationError::Connection("pool timed out".into())),
        );
        assert_eq!(settled.unwrap_err().error_code(), "EXECUTION_FAILED");
    }

    #[test]
    fn test_clean_close_passes_result_through() {
        let settled: MigrationResult<RunReport> = settle(
            Err(MigrationError::execution("002_bad.sql", "syntax error")),
            Ok(()),
        );
        assert_eq!(settled.unwrap_err().filename(), Some("002_bad.sql"));
    }
}
