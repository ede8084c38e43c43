//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Command-line flags override the environment.
//!
//! | Variable                  | Default                                  |
//! |---------------------------|------------------------------------------|
//! | `BEBIDAS_DB_PATH`         | platform data dir + `bebidas.db`         |
//! | `BEBIDAS_SEED_ON_START`   | `true`                                   |
//! | `BEBIDAS_MAX_CONNECTIONS` | `5`                                      |

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use bebidas_db::DbConfig;

/// File name of the catalog database inside the data directory.
pub const DB_FILE_NAME: &str = "bebidas.db";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Seed the bundled catalog when the database is empty
    pub seed_on_start: bool,

    /// Connection pool size
    pub max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = match lookup("BEBIDAS_DB_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };

        let seed_on_start = match lookup("BEBIDAS_SEED_ON_START") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("BEBIDAS_SEED_ON_START".to_string()))?,
            None => true,
        };

        let max_connections: u32 = lookup("BEBIDAS_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BEBIDAS_MAX_CONNECTIONS".to_string()))?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue("BEBIDAS_MAX_CONNECTIONS".to_string()));
        }

        Ok(AppConfig {
            db_path,
            seed_on_start,
            max_connections,
        })
    }

    /// Applies `--db` and `--no-seed`.
    pub fn with_overrides(mut self, db_path: Option<PathBuf>, no_seed: bool) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        if no_seed {
            self.seed_on_start = false;
        }
        self
    }

    /// Pool configuration for [`bebidas_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.max_connections)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.bebidas.catalog/bebidas.db`
/// - **Windows**: `%APPDATA%\bebidas\catalog\data\bebidas.db`
/// - **Linux**: `~/.local/share/catalog/bebidas.db`
///
/// The directory is created if it doesn't exist.
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("com", "bebidas", "catalog").ok_or(ConfigError::NoDataDir)?;
    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join(DB_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("Could not create data directory {0}")]
    DataDir(String),
}
