//! Sequential application of SQL migration files.

pub mod discovery;
pub mod runner;
pub mod store;
pub mod types;


pub use discovery::{Discovery, discover};
pub use runner::MigrationRunner;
pub use store::MigrationStore;
pub use types::{
    ApplyOutcome, MigrationFile, MigrationRecord, MigrationStatus, RunOutcome, RunReport,
    StatusReport,
};
