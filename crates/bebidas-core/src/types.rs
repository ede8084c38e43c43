//! # Domain Types
//!
//! Core domain types used throughout Bebidas.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Drink       │   │    Category     │   │   ServeTemp     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (slug)      │   │  Tradition      │   │  Cold           │       │
//! │  │  name_es        │   │  Alcohol        │   │  Hot            │       │
//! │  │  origin_country │   │  Coffee         │   └─────────────────┘       │
//! │  │  abv (optional) │   │  Soft           │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A drink's `id` is a slug derived from `name_es` when it is created
//! (see [`crate::slug`]). It never changes afterwards; there is no update.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Category
// =============================================================================

/// The kind of drink. Persisted as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Traditional preparations (mate, horchata, ...).
    Tradition,
    /// Alcoholic drinks.
    Alcohol,
    /// Coffee-based drinks.
    Coffee,
    /// Soft drinks and juices.
    Soft,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Tradition,
        Category::Alcohol,
        Category::Coffee,
        Category::Soft,
    ];

    /// The persisted / wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Tradition => "tradition",
            Category::Alcohol => "alcohol",
            Category::Coffee => "coffee",
            Category::Soft => "soft",
        }
    }

    /// The persisted names of all categories.
    pub fn names() -> Vec<&'static str> {
        Category::ALL.iter().map(Category::as_str).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::not_allowed("category", &Category::names()))
    }
}

// =============================================================================
// Serve Temperature
// =============================================================================

/// How the drink is served. Persisted as `cold` / `hot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ServeTemp {
    Cold,
    Hot,
}

impl ServeTemp {
    pub const ALL: [ServeTemp; 2] = [ServeTemp::Cold, ServeTemp::Hot];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ServeTemp::Cold => "cold",
            ServeTemp::Hot => "hot",
        }
    }

    /// Spanish label shown to users.
    pub const fn label_es(&self) -> &'static str {
        match self {
            ServeTemp::Cold => "fría",
            ServeTemp::Hot => "caliente",
        }
    }
}

impl fmt::Display for ServeTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the stored names and the Spanish form labels.
impl FromStr for ServeTemp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cold" | "fría" | "fria" => Ok(ServeTemp::Cold),
            "hot" | "caliente" => Ok(ServeTemp::Hot),
            _ => Err(ValidationError::not_allowed(
                "serve_temp",
                &["cold", "hot", "fría", "caliente"],
            )),
        }
    }
}

// =============================================================================
// Drink
// =============================================================================

/// A beverage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Drink {
    /// Slug identifier, unique and immutable.
    pub id: String,

    /// Display name in Spanish.
    pub name_es: String,

    /// Country the drink comes from.
    pub origin_country: String,

    pub category: Category,

    /// Percent alcohol by volume. `None` means not applicable or unknown.
    pub abv: Option<f64>,

    pub serve_temp: ServeTemp,

    /// Trivia shown on the detail view.
    pub fun_fact_es: Option<String>,

    pub image_url: Option<String>,
}

impl Drink {
    /// Assigns an identifier to a creation payload.
    pub fn from_new(id: impl Into<String>, new: NewDrink) -> Self {
        Drink {
            id: id.into(),
            name_es: new.name_es,
            origin_country: new.origin_country,
            category: new.category,
            abv: new.abv,
            serve_temp: new.serve_temp,
            fun_fact_es: new.fun_fact_es,
            image_url: new.image_url,
        }
    }
}

/// A drink that has not been given an identifier yet.
///
/// Produced by the input boundary after validation; the store turns it into
/// a [`Drink`] by deriving the id from `name_es`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrink {
    pub name_es: String,
    pub origin_country: String,
    pub category: Category,
    #[serde(default)]
    pub abv: Option<f64>,
    pub serve_temp: ServeTemp,
    #[serde(default)]
    pub fun_fact_es: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
