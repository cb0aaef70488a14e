//! Core migration logic for Migrun.
//!
//! This crate contains everything that does not need a database driver:
//! - Discovery of migration files on disk
//! - The `MigrationStore` trait implemented by database backends
//! - The sequential `MigrationRunner`

pub mod migration;

pub use migration::{
    ApplyOutcome, Discovery, MigrationFile, MigrationRecord, MigrationRunner, MigrationStatus,
    MigrationStore, RunOutcome, RunReport, StatusReport, discover,
};
