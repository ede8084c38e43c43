//! # Validation Module
//!
//! Input validation at the presentation boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  └── Argument shape, flags                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Trim, empty → absent                                              │
//! │  ├── Required fields, enum membership                                  │
//! │  └── Numeric parsing (abv, abv_min, abv_max)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── PRIMARY KEY uniqueness                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The slug generator and the filter compiler only ever see values that
//! passed through here.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::filter::DrinkQuery;
use crate::types::{Category, NewDrink, ServeTemp};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Raw Inputs
// =============================================================================

/// Raw listing parameters, exactly as the user typed them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub abv_min: Option<String>,
    pub abv_max: Option<String>,
}

impl ListParams {
    /// Trims and parses every parameter into a [`DrinkQuery`].
    ///
    /// ## Example
    /// ```rust
    /// use bebidas_core::validation::ListParams;
    ///
    /// let params = ListParams {
    ///     q: Some("  mate ".to_string()),
    ///     abv_max: Some("0".to_string()),
    ///     ..Default::default()
    /// };
    /// let query = params.validate().unwrap();
    /// assert_eq!(query.q.as_deref(), Some("mate"));
    /// assert_eq!(query.abv_max, Some(0.0));
    /// ```
    pub fn validate(&self) -> ValidationResult<DrinkQuery> {
        Ok(DrinkQuery {
            q: optional_text(self.q.as_deref()),
            country: optional_text(self.country.as_deref()),
            category: parse_category_filter(self.category.as_deref())?,
            abv_min: parse_abv_bound("abv_min", self.abv_min.as_deref())?,
            abv_max: parse_abv_bound("abv_max", self.abv_max.as_deref())?,
        })
    }
}

/// Raw fields of the "add drink" form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrinkForm {
    pub name_es: Option<String>,
    pub origin_country: Option<String>,
    pub category: Option<String>,
    pub serve_temp: Option<String>,
    pub abv: Option<String>,
    pub fun_fact_es: Option<String>,
    pub image_url: Option<String>,
}

impl DrinkForm {
    /// Checks required fields and enum values and builds a [`NewDrink`].
    ///
    /// ## Rules
    /// - `name_es`, `origin_country`, `category`, `serve_temp` are required
    /// - `category` must be one of the four categories
    /// - `serve_temp` must be cold/hot (Spanish labels accepted)
    /// - `abv`, if given, must be a non-negative number
    /// - empty optional fields become absent
    pub fn validate(&self) -> ValidationResult<NewDrink> {
        let name_es = required_text("name_es", self.name_es.as_deref())?;
        let origin_country = required_text("origin_country", self.origin_country.as_deref())?;
        let category: Category = required_text("category", self.category.as_deref())?.parse()?;
        let serve_temp: ServeTemp =
            required_text("serve_temp", self.serve_temp.as_deref())?.parse()?;
        let abv = parse_abv(self.abv.as_deref())?;

        Ok(NewDrink {
            name_es,
            origin_country,
            category,
            abv,
            serve_temp,
            fun_fact_es: optional_text(self.fun_fact_es.as_deref()),
            image_url: optional_text(self.image_url.as_deref()),
        })
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Trims a value; blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trims a required value and rejects blank input.
pub fn required_text(field: &str, value: Option<&str>) -> ValidationResult<String> {
    optional_text(value).ok_or_else(|| ValidationError::required(field))
}

/// Parses the optional category filter. Blank means "any category".
pub fn parse_category_filter(value: Option<&str>) -> ValidationResult<Option<Category>> {
    optional_text(value).map(|s| s.parse()).transpose()
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn parse_number(field: &str, raw: &str) -> ValidationResult<f64> {
    let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{raw}' is not a number"),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    Ok(value)
}

/// Parses an `abv_min` / `abv_max` listing bound. Blank means "no bound".
///
/// ## Example
/// ```rust
/// use bebidas_core::validation::parse_abv_bound;
///
/// assert_eq!(parse_abv_bound("abv_min", Some("4.5")).unwrap(), Some(4.5));
/// assert_eq!(parse_abv_bound("abv_min", Some(" ")).unwrap(), None);
/// assert!(parse_abv_bound("abv_min", Some("strong")).is_err());
/// ```
pub fn parse_abv_bound(field: &str, value: Option<&str>) -> ValidationResult<Option<f64>> {
    optional_text(value)
        .map(|raw| parse_number(field, &raw))
        .transpose()
}

/// Parses the abv of a new drink. Blank means "not applicable".
pub fn parse_abv(value: Option<&str>) -> ValidationResult<Option<f64>> {
    let abv = parse_abv_bound("abv", value)?;
    if let Some(abv) = abv {
        validate_abv(abv)?;
    }
    Ok(abv)
}

/// An abv must not be negative.
pub fn validate_abv(abv: f64) -> ValidationResult<()> {
    if !abv.is_finite() || abv < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "abv".to_string(),
            min: 0.0,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
