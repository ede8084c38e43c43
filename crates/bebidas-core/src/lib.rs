//! # bebidas-core: Pure Domain Logic for the Bebidas Catalog
//!
//! This crate holds everything about drinks that does not need a database:
//! the domain types, the identifier generator and the filter compiler.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bebidas Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bebidas-cli (presentation)                   │   │
//! │  │      today ──► list ──► show ──► add ──► delete                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bebidas-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   slug    │  │  filter   │  │ validation│  │   │
//! │  │   │   Drink   │  │ slugify   │  │ DrinkQuery│  │   rules   │  │   │
//! │  │   │ Category  │  │ unique_id │  │ Predicate │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bebidas-db (Record Store)                      │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Drink, Category, ServeTemp)
//! - [`slug`] - Identifier generation from display names
//! - [`filter`] - Listing filters compiled into predicates
//! - [`validation`] - Boundary validation for user input
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bebidas_core::slug::unique_id_from;
//!
//! let taken = ["cafe-con-leche"];
//! let id = unique_id_from("Café con Leche", |c| taken.contains(&c));
//! assert_eq!(id, "cafe-con-leche-2");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod slug;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::{AbvMax, AbvMin, DrinkFilter, DrinkQuery, Predicate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Base token used when a name slugifies to nothing.
pub const FALLBACK_SLUG: &str = "drink";
