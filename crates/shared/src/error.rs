//! Migration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `MigrationError`.
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Errors raised while discovering, applying or recording migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The migrations directory could not be listed.
    #[error("failed to list migrations in {}: {message}", path.display())]
    Discovery {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O message.
        message: String,
    },

    /// A migration file exists but could not be read as text.
    #[error("failed to read migration {filename}: {message}")]
    Read {
        /// Migration file name.
        filename: String,
        /// Underlying I/O message.
        message: String,
    },

    /// The migration SQL failed to execute.
    #[error("migration {filename} failed: {message}")]
    Execution {
        /// Migration file name.
        filename: String,
        /// Database error message.
        message: String,
    },

    /// The migration ran but could not be recorded in the tracking table.
    #[error("migration {filename} applied but not recorded: {message}")]
    Record {
        /// Migration file name.
        filename: String,
        /// Database error message.
        message: String,
    },

    /// The tracking table could not be created.
    #[error("failed to prepare tracking table: {0}")]
    TrackingTable(String),

    /// A read against the tracking table failed.
    #[error("tracking query failed: {0}")]
    Query(String),

    /// Connecting to or closing the database failed.
    #[error("database connection error: {0}")]
    Connection(String),
}

impl MigrationError {
    /// Returns a stable code for logs and scripting.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Discovery { .. } => "DISCOVERY_FAILED",
            Self::Read { .. } => "READ_FAILED",
            Self::Execution { .. } => "EXECUTION_FAILED",
            Self::Record { .. } => "RECORD_FAILED",
            Self::TrackingTable(_) => "TRACKING_TABLE_FAILED",
            Self::Query(_) => "QUERY_FAILED",
            Self::Connection(_) => "CONNECTION_FAILED",
        }
    }

    /// Returns the migration file the error concerns, if any.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Read { filename, .. }
            | Self::Execution { filename, .. }
            | Self::Record { filename, .. } => Some(filename),
            _ => None,
        }
    }

    /// Create an execution error.
    #[must_use]
    pub fn execution(filename: impl Into<String>, message: impl ToString) -> Self {
        Self::Execution {
            filename: filename.into(),
            message: message.to_string(),
        }
    }

    /// Create a record error.
    #[must_use]
    pub fn record(filename: impl Into<String>, message: impl ToString) -> Self {
        Self::Record {
            filename: filename.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MigrationError::execution("a.sql", "x").error_code(),
            "EXECUTION_FAILED"
        );
        assert_eq!(
            MigrationError::record("a.sql", "x").error_code(),
            "RECORD_FAILED"
        );
        assert_eq!(MigrationError::Query(String::new()).error_code(), "QUERY_FAILED");
        assert_eq!(
            MigrationError::Connection(String::new()).error_code(),
            "CONNECTION_FAILED"
        );
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            MigrationError::execution("002_bad.sql", "x").filename(),
            Some("002_bad.sql")
        );
        assert_eq!(MigrationError::Query(String::new()).filename(), None);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            MigrationError::execution("002_bad.sql", "syntax error at or near \"SELEC\"")
                .to_string(),
            "migration 002_bad.sql failed: syntax error at or near \"SELEC\""
        );
        assert_eq!(
            MigrationError::record("001_init.sql", "duplicate key").to_string(),
            "migration 001_init.sql applied but not recorded: duplicate key"
        );
        assert_eq!(
            MigrationError::Discovery {
                path: PathBuf::from("db/migrations"),
                message: "permission denied".into()
            }
            .to_string(),
            "failed to list migrations in db/migrations: permission denied"
        );
    }
}
