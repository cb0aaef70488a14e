//! Migration types.

use std::path::PathBuf;

use chrono::NaiveDateTime;

/// A migration file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// File name, also the key recorded in the tracking table.
    pub filename: String,
    /// Full path to the file.
    pub path: PathBuf,
}

/// A row of the tracking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    /// Auto-incrementing identifier.
    pub id: i32,
    /// Applied migration file name.
    pub filename: String,
    /// When the migration was recorded.
    pub executed_at: NaiveDateTime,
}

/// What happened to a single migration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The SQL ran and the file was recorded.
    Applied,
    /// The file was already recorded; nothing ran.
    AlreadyExecuted,
    /// The file disappeared before it could be read; nothing ran.
    MissingFile,
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The migrations directory does not exist.
    MissingDirectory,
    /// The directory holds no migration files.
    NoFiles,
    /// Every discovered file was visited.
    Completed,
}

/// Summary of a successful run, file names in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Files applied during this run.
    pub applied: Vec<String>,
    /// Files skipped because they were already recorded.
    pub already_executed: Vec<String>,
    /// Files skipped because they vanished after listing.
    pub missing: Vec<String>,
}

impl RunReport {
    /// Creates an empty report with the given outcome.
    #[must_use]
    pub const fn new(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            applied: Vec::new(),
            already_executed: Vec::new(),
            missing: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, filename: &str, outcome: ApplyOutcome) {
        let list = match outcome {
            ApplyOutcome::Applied => &mut self.applied,
            ApplyOutcome::AlreadyExecuted => &mut self.already_executed,
            ApplyOutcome::MissingFile => &mut self.missing,
        };
        list.push(filename.to_string());
    }

    /// Whether the run changed the database.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// State of one discovered migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// File name.
    pub filename: String,
    /// When it was applied, `None` while pending.
    pub executed_at: Option<NaiveDateTime>,
}

impl MigrationStatus {
    /// Whether the file has not been applied yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.executed_at.is_none()
    }
}

/// Discovered files joined with the tracking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Whether the migrations directory exists.
    pub directory_found: bool,
    /// One entry per discovered file, in run order.
    pub migrations: Vec<MigrationStatus>,
    /// Records whose file is no longer on disk, ordered by id.
    pub orphaned: Vec<MigrationRecord>,
}

impl StatusReport {
    /// Number of files still waiting to be applied.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.migrations.iter().filter(|m| m.is_pending()).count()
    }
}
