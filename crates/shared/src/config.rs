//! Application configuration management.

use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;

/// Environment variable prefix for layered overrides (`MIGRUN__DATABASE__URL`).
pub const ENV_PREFIX: &str = "MIGRUN";

/// Conventional database URL variable, honored when no prefixed URL is set.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Migration discovery configuration.
    #[serde(default)]
    pub migrations: MigrationsConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a connection before giving up.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

// One session per run keeps every batch on the same connection.
fn default_max_connections() -> u32 {
    1
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

/// Migration discovery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationsConfig {
    /// Directory holding the migration files.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// File extension (without the dot) of migration files.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_extension() -> String {
    "sql".to_string()
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            extension: default_extension(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// `DATABASE_URL`, then `MIGRUN__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_overrides(&[])
    }

    /// Loads configuration like [`Self::load`], then applies `overrides`
    /// (dotted keys such as `database.url`) on top of every other source.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_with_overrides(overrides: &[(&str, String)]) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        let prefixed_url = format!("{ENV_PREFIX}__DATABASE__URL");
        if std::env::var_os(&prefixed_url).is_none() {
            if let Ok(url) = std::env::var(DATABASE_URL_VAR) {
                builder = builder.set_override("database.url", url)?;
            }
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));
        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        let config = builder.build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Checks values the deserializer cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message("database.url must not be empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Message(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        let ext = &self.migrations.extension;
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::Message(format!(
                "migrations.extension '{ext}' must be a bare extension such as 'sql'"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: "postgres://localhost/app".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
            },
            migrations: MigrationsConfig::default(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = sample();
        assert_eq!(config.migrations.dir, PathBuf::from("migrations"));
        assert_eq!(config.migrations.extension, "sql");
        assert_eq!(config.database.max_connections, 1);
        assert!(config.validate().is_ok());
    }

    #[rstest::rstest]
    #[case("")]
    #[case(".sql")]
    #[case("a/b")]
    #[case("a\\b")]
    fn test_rejects_bad_extension(#[case] ext: &str) {
        let mut config = sample();
        config.migrations.extension = ext.to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_url() {
        let mut config = sample();
        config.database.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_pool_bounds() {
        let mut config = sample();
        config.database.min_connections = 5;
        config.database.max_connections = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_connections"));
    }

    #[test]
    fn test_load_uses_database_url() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://plain/db")),
                ("MIGRUN__DATABASE__URL", None),
                ("MIGRUN__MIGRATIONS__DIR", Some("db/migrations")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.database.url, "postgres://plain/db");
                assert_eq!(config.migrations.dir, PathBuf::from("db/migrations"));
                assert_eq!(config.migrations.extension, "sql");
            },
        );
    }

    #[test]
    fn test_prefixed_url_wins() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://plain/db")),
                ("MIGRUN__DATABASE__URL", Some("postgres://prefixed/db")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.database.url, "postgres://prefixed/db");
            },
        );
    }

    #[test]
    fn test_overrides_beat_environment() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://plain/db")),
                ("MIGRUN__MIGRATIONS__EXTENSION", Some("pgsql")),
            ],
            || {
                let config = AppConfig::load_with_overrides(&[
                    ("database.url", "postgres://flag/db".to_string()),
                    ("migrations.extension", "sql".to_string()),
                ])
                .expect("config should load");
                assert_eq!(config.database.url, "postgres://flag/db");
                assert_eq!(config.migrations.extension, "sql");
            },
        );
    }

    #[test]
    fn test_load_fails_without_url() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", None::<&str>),
                ("MIGRUN__DATABASE__URL", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
