//! # Bebidas CLI Library
//!
//! The presentation layer of the drink catalog: startup, commands and
//! rendering. `main.rs` only parses arguments and dispatches.
//!
//! ## Module Organization
//! ```text
//! bebidas_cli/
//! ├── lib.rs          ◄─── You are here (startup)
//! ├── config.rs       ◄─── AppConfig from env + flags
//! ├── commands/       ◄─── today, list, show, add, delete
//! ├── render.rs       ◄─── plain-text output
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()            RUST_LOG or the default filter           │
//! │  2. AppConfig::load()         env vars, then --db / --no-seed          │
//! │  3. Database::new(config)     pool + migrations                        │
//! │  4. seed_if_empty()           bundled catalog, only on an empty store  │
//! │  5. run the command with &Database                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bebidas_db::seed::{default_seed, seed_if_empty};
use bebidas_db::Database;
use config::AppConfig;
use error::ApiError;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bebidas=trace` - Show trace for bebidas crates only
/// - Default: INFO, DEBUG for bebidas crates
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bebidas=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the catalog and provisions it.
///
/// Runs migrations, then seeds the bundled catalog when the store is empty
/// and `seed_on_start` is set.
pub async fn open_database(config: &AppConfig) -> Result<Database, ApiError> {
    info!(path = %config.db_path.display(), "Opening catalog");
    let db = Database::new(config.db_config()).await?;

    if config.seed_on_start {
        let seeded = seed_if_empty(&db, &default_seed()?).await?;
        if seeded > 0 {
            info!(seeded, "Catalog provisioned from bundled seed");
        }
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_for(path: PathBuf, seed_on_start: bool) -> AppConfig {
        AppConfig {
            db_path: path,
            seed_on_start,
            max_connections: 2,
        }
    }

    #[tokio::test]
    async fn test_open_database_seeds_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path().join("bebidas.db"), true);

        let db = open_database(&config).await.unwrap();
        let count = db.drinks().count().await.unwrap();
        assert!(count > 0);
        db.drinks().delete("mate").await.unwrap();
        db.close().await;

        let db = open_database(&config).await.unwrap();
        assert_eq!(db.drinks().count().await.unwrap(), count - 1);
        db.close().await;
    }

    #[tokio::test]
    async fn test_open_database_without_seed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path().join("bebidas.db"), false);

        let db = open_database(&config).await.unwrap();
        assert_eq!(db.drinks().count().await.unwrap(), 0);
        db.close().await;
    }
}
