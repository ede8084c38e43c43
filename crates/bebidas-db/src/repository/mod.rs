//! # Repository Module
//!
//! Database repository implementations for Bebidas.
//!
//! ```text
//! CLI command
//!      │  db.drinks().search(&filter)
//!      ▼
//! DrinkRepository
//! ├── search(&self, filter)
//! ├── get_by_id(&self, id)
//! ├── get_at_offset(&self, n)
//! ├── create(&self, new_drink)
//! └── delete(&self, id)
//!      │  SQL query
//!      ▼
//! SQLite database
//! ```
//!
//! ## Available Repositories
//!
//! - [`drink::DrinkRepository`] - Drink lookup, filtered listing, create and delete

pub mod drink;
