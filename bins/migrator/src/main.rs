//! Database migration runner for Migrun.
//!
//! Usage:
//!   migrator [up]    - Run all pending migrations
//!   migrator status  - Show migration status
//!
//! Exits non-zero when any migration fails.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use migrun_shared::AppConfig;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.global.verbose {
        "migrator=debug,migrun_core=debug,migrun_db=debug"
    } else {
        "migrator=info,migrun_core=info,migrun_db=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let overrides = cli.global.overrides();
    let config =
        AppConfig::load_with_overrides(&overrides).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Up) {
        Commands::Up => commands::up(&config).await,
        Commands::Status => commands::status(&config).await,
    }
}
