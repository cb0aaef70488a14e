//! Subcommand implementations.

use anyhow::Result;
use tracing::error;

use migrun_core::{RunOutcome, StatusReport};
use migrun_shared::AppConfig;

/// Applies pending migrations and prints a summary.
pub async fn up(config: &AppConfig) -> Result<()> {
    let report = match migrun_db::run_migrations(config).await {
        Ok(report) => report,
        Err(e) => {
            error!(code = e.error_code(), error = %e, "Migration failed");
            return Err(e.into());
        }
    };

    match report.outcome {
        RunOutcome::MissingDirectory => {
            println!(
                "Migrations directory {} not found, nothing to do",
                config.migrations.dir.display()
            );
        }
        RunOutcome::NoFiles => println!("No migration files found"),
        RunOutcome::Completed => println!(
            "Applied {} migration(s), {} already executed, {} missing",
            report.applied.len(),
            report.already_executed.len(),
            report.missing.len()
        ),
    }

    Ok(())
}

/// Prints one line per migration file and per orphaned record.
pub async fn status(config: &AppConfig) -> Result<()> {
    let report = migrun_db::migration_status(config).await?;
    print!("{}", render_status(&report));
    Ok(())
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn render_status(report: &StatusReport) -> String {
    let mut out = String::new();
    if !report.directory_found {
        out.push_str("Migrations directory not found\n");
    }
    for migration in &report.migrations {
        match migration.executed_at {
            Some(at) => out.push_str(&format!(
                "[x] {}  {}\n",
                migration.filename,
                at.format(TIMESTAMP_FORMAT)
            )),
            None => out.push_str(&format!("[ ] {}\n", migration.filename)),
        }
    }
    for record in &report.orphaned {
        out.push_str(&format!(
            "[?] {}  {}  (file missing)\n",
            record.filename,
            record.executed_at.format(TIMESTAMP_FORMAT)
        ));
    }
    out.push_str(&format!("{} pending\n", report.pending_count()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrun_core::{MigrationRecord, MigrationStatus};

    fn at(hour: u32) -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_render_status() {
        let report = StatusReport {
            directory_found: true,
            migrations: vec![
                MigrationStatus {
                    filename: "001_init.sql".to_string(),
                    executed_at: Some(at(10)),
                },
                MigrationStatus {
                    filename: "002_seed.sql".to_string(),
                    executed_at: None,
                },
            ],
            orphaned: vec![MigrationRecord {
                id: 1,
                filename: "000_old.sql".to_string(),
                executed_at: at(9),
            }],
        };

        assert_eq!(
            render_status(&report),
            "[x] 001_init.sql  2026-01-01 10:00:00\n\
             [ ] 002_seed.sql\n\
             [?] 000_old.sql  2026-01-01 09:00:00  (file missing)\n\
             1 pending\n"
        );
    }

    #[test]
    fn test_render_missing_directory() {
        let report = StatusReport {
            directory_found: false,
            migrations: Vec::new(),
            orphaned: Vec::new(),
        };
        assert_eq!(
            render_status(&report),
            "Migrations directory not found\n0 pending\n"
        );
    }

    #[test]
    fn test_render_all_applied_lists_every_line() {
        let report = StatusReport {
            directory_found: true,
            migrations: (1..=3)
                .map(|n| MigrationStatus {
                    filename: format!("00{n}_step.sql"),
                    executed_at: Some(at(n)),
                })
                .collect(),
            orphaned: Vec::new(),
        };
        let rendered = render_status(&report);
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.starts_with("[x] 001_step.sql  2026-01-01 01:00:00\n"));
        assert!(rendered.ends_with("[x] 003_step.sql  2026-01-01 03:00:00\n0 pending\n"));
    }
}
