//! # bebidas-db: Record Store for Bebidas
//!
//! This crate provides database access for the Bebidas catalog.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bebidas Data Flow                                │
//! │                                                                         │
//! │  CLI command (list_drinks)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bebidas-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (drink.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ DrinkRepo     │    │ 001_create_  │  │   │
//! │  │   │ Connection    │    │ + seed.rs     │    │   drinks.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (bebidas.db, WAL mode)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The drink repository
//! - [`seed`] - Provisioning an empty catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bebidas_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bebidas.db")).await?;
//! bebidas_db::seed::seed_if_empty(&db, &bebidas_db::seed::default_seed()?).await?;
//!
//! let drinks = db.drinks().search(&query.compile()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::drink::DrinkRepository;
