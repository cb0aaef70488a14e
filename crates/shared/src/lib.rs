//! Shared configuration and error types for Migrun.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Layered configuration (`AppConfig`)
//! - The migration error type (`MigrationError`)

pub mod config;
pub mod error;

pub use config::{AppConfig, DatabaseConfig, MigrationsConfig};
pub use error::{MigrationError, MigrationResult};
