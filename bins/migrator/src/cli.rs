//! CLI argument definitions using clap derive API

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Apply SQL migration files to a PostgreSQL database, in name order, once each
#[derive(Parser, Debug)]
#[command(name = "migrator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute (defaults to `up`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing migration files
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Extension of migration files, without the dot
    #[arg(short, long, global = true)]
    pub extension: Option<String>,
}

impl GlobalArgs {
    /// Configuration overrides for flags that were given.
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(url) = &self.database_url {
            overrides.push(("database.url", url.clone()));
        }
        if let Some(dir) = &self.dir {
            overrides.push(("migrations.dir", dir.display().to_string()));
        }
        if let Some(extension) = &self.extension {
            overrides.push(("migrations.extension", extension.clone()));
        }
        overrides
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run all pending migrations
    Up,

    /// Show applied and pending migrations
    Status,
}
