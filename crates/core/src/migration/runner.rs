//! Sequential migration runner.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use migrun_shared::{MigrationError, MigrationResult, MigrationsConfig};
use tracing::{error, info, warn};

use super::discovery::{Discovery, discover};
use super::store::MigrationStore;
use super::types::{ApplyOutcome, MigrationStatus, RunOutcome, RunReport, StatusReport};

/// Applies migration files from one directory, in name order, through a store.
///
/// The runner borrows the store; opening and closing the underlying
/// connection is the caller's job.
pub struct MigrationRunner<'a, S: ?Sized> {
    store: &'a S,
    dir: PathBuf,
    extension: String,
}

impl<'a, S: MigrationStore + ?Sized> MigrationRunner<'a, S> {
    /// Creates a runner over `dir` for files ending in `.{extension}`.
    pub fn new(store: &'a S, dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            store,
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Creates a runner from the `[migrations]` configuration section.
    pub fn from_config(store: &'a S, config: &MigrationsConfig) -> Self {
        Self::new(store, config.dir.clone(), config.extension.clone())
    }

    /// Directory migrations are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Applies a single migration file by name.
    ///
    /// A file that cannot be found is logged and skipped. A file that is
    /// already recorded is skipped without being read. Otherwise its full
    /// text runs as one batch and is then recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if a pending file cannot be read as text, the SQL
    /// fails, or the tracking record cannot be written. A batch that
    /// succeeded stays applied when recording fails.
    pub async fn apply(&self, filename: &str) -> MigrationResult<ApplyOutcome> {
        let path = self.dir.join(filename);

        match tokio::fs::metadata(&path).await {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(missing(filename)),
            Err(e) => return Err(read_error(filename, &e)),
        }

        if self.store.is_executed(filename).await? {
            info!(filename = %filename, "Migration already executed, skipping");
            return Ok(ApplyOutcome::AlreadyExecuted);
        }

        let sql = match tokio::fs::read_to_string(&path).await {
            Ok(sql) => sql,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(missing(filename)),
            Err(e) => return Err(read_error(filename, &e)),
        };

        info!(filename = %filename, "Running migration");

        if let Err(e) = self.store.execute_batch(filename, &sql).await {
            error!(filename = %filename, error = %e, "Error running migration");
            return Err(e);
        }

        if let Err(e) = self.store.mark_executed(filename).await {
            error!(
                filename = %filename,
                error = %e,
                "Migration applied but could not be recorded"
            );
            return Err(e);
        }

        info!(filename = %filename, "Migration completed");
        Ok(ApplyOutcome::Applied)
    }

    /// Applies every pending migration in name order.
    ///
    /// Stops at the first failure; files after it are not touched. A missing
    /// or empty directory is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: tracking table setup, directory
    /// listing, or any error from [`Self::apply`].
    pub async fn run_all(&self) -> MigrationResult<RunReport> {
        info!(dir = %self.dir.display(), "Starting database migrations");

        if let Err(e) = self.store.ensure_tracking_table().await {
            error!(error = %e, "Error creating migrations table");
            return Err(e);
        }
        info!("Migrations table ready");

        let files = match discover(&self.dir, &self.extension)? {
            Discovery::MissingDirectory => {
                warn!(dir = %self.dir.display(), "Migrations directory not found");
                return Ok(RunReport::new(RunOutcome::MissingDirectory));
            }
            Discovery::Found(files) => files,
        };

        if files.is_empty() {
            info!("No migration files found");
            return Ok(RunReport::new(RunOutcome::NoFiles));
        }

        info!(count = files.len(), "Found migration files");

        let mut report = RunReport::new(RunOutcome::Completed);
        for file in &files {
            let outcome = self.apply(&file.filename).await?;
            report.push(&file.filename, outcome);
        }

        info!(
            applied = report.applied.len(),
            already_executed = report.already_executed.len(),
            missing = report.missing.len(),
            "All migrations completed successfully"
        );

        Ok(report)
    }

    /// Joins discovered files with the tracking table.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracking table cannot be prepared or read, or
    /// the directory cannot be listed.
    pub async fn status(&self) -> MigrationResult<StatusReport> {
        self.store.ensure_tracking_table().await?;
        let records = self.store.executed().await?;

        let (directory_found, files) = match discover(&self.dir, &self.extension)? {
            Discovery::MissingDirectory => (false, Vec::new()),
            Discovery::Found(files) => (true, files),
        };

        let recorded: HashMap<&str, _> = records
            .iter()
            .map(|r| (r.filename.as_str(), r.executed_at))
            .collect();

        let migrations = files
            .iter()
            .map(|f| MigrationStatus {
                filename: f.filename.clone(),
                executed_at: recorded.get(f.filename.as_str()).copied(),
            })
            .collect();

        let orphaned = records
            .iter()
            .filter(|r| !files.iter().any(|f| f.filename == r.filename))
            .cloned()
            .collect();

        Ok(StatusReport {
            directory_found,
            migrations,
            orphaned,
        })
    }
}

fn missing(filename: &str) -> ApplyOutcome {
    warn!(filename = %filename, "Migration file not found, skipping");
    ApplyOutcome::MissingFile
}

fn read_error(filename: &str, err: &io::Error) -> MigrationError {
    error!(filename = %filename, error = %err, "Failed to read migration");
    MigrationError::Read {
        filename: filename.to_string(),
        message: err.to_string(),
    }
}
