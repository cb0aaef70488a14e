//! Listing of migration files on disk.
//!
//! Files run in byte-wise ascending order of their names, so names must sort
//! in dependency order. Zero-padded prefixes (`001_init.sql`,
//! `002_seed.sql`) are the expected convention.

use std::io;
use std::path::Path;

use migrun_shared::{MigrationError, MigrationResult};
use tracing::{debug, warn};

use super::types::MigrationFile;

/// Result of scanning the migrations directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// The directory does not exist.
    MissingDirectory,
    /// Matching files, sorted by name.
    Found(Vec<MigrationFile>),
}

/// Lists regular files in `dir` ending in `.{extension}`, sorted by name.
///
/// # Errors
///
/// Returns `MigrationError::Discovery` if the directory exists but cannot be
/// read.
pub fn discover(dir: &Path, extension: &str) -> MigrationResult<Discovery> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Discovery::MissingDirectory),
        Err(e) => return Err(discovery_error(dir, &e)),
    };

    let suffix = format!(".{extension}");
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| discovery_error(dir, &e))?;
        let path = entry.path();

        let Ok(filename) = entry.file_name().into_string() else {
            warn!(path = %path.display(), "Skipping migration with non UTF-8 file name");
            continue;
        };

        if !filename.ends_with(&suffix) {
            continue;
        }

        if !path.is_file() {
            debug!(filename = %filename, "Skipping non-file entry");
            continue;
        }

        files.push(MigrationFile { filename, path });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(Discovery::Found(files))
}

fn discovery_error(dir: &Path, err: &io::Error) -> MigrationError {
    MigrationError::Discovery {
        path: dir.to_path_buf(),
        message: err.to_string(),
    }
}
