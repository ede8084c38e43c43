//! # Drink Commands
//!
//! Catalog operations behind the CLI subcommands.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bebidas list --q argentina --abv-max 0                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ListParams (raw strings)                                              │
//! │       │  validate(): trim, blank → absent, parse numbers/enums         │
//! │       ▼                                                                 │
//! │  DrinkQuery ──compile()──► DrinkFilter                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.drinks().search(&filter)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DrinkList { drinks, filters, categories } → render / --json          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use bebidas_core::validation::{DrinkForm, ListParams};
use bebidas_core::{Category, CoreError, Drink, DrinkQuery, ServeTemp};
use bebidas_db::Database;

/// Drink DTO for output.
///
/// Adds the Spanish serve temperature label next to the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkDto {
    pub id: String,
    pub name_es: String,
    pub origin_country: String,
    pub category: Category,
    pub abv: Option<f64>,
    pub serve_temp: ServeTemp,
    pub serve_temp_label: String,
    pub fun_fact_es: Option<String>,
    pub image_url: Option<String>,
}

impl From<Drink> for DrinkDto {
    fn from(d: Drink) -> Self {
        DrinkDto {
            serve_temp_label: d.serve_temp.label_es().to_string(),
            id: d.id,
            name_es: d.name_es,
            origin_country: d.origin_country,
            category: d.category,
            abv: d.abv,
            serve_temp: d.serve_temp,
            fun_fact_es: d.fun_fact_es,
            image_url: d.image_url,
        }
    }
}

/// Result of `list_drinks`: the matches plus what the listing view echoes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrinkList {
    pub drinks: Vec<DrinkDto>,
    /// Effective filters after trimming and parsing.
    pub filters: DrinkQuery,
    /// Every category, for the filter selector.
    pub categories: Vec<String>,
}

/// What `delete_drink` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Picks a uniformly random drink.
///
/// ## Returns
/// * `Ok(None)` - The catalog is empty
/// * `Ok(Some(drink))` - A drink drawn uniformly from the catalog
pub async fn drink_of_the_day<R: Rng>(
    db: &Database,
    rng: &mut R,
) -> Result<Option<DrinkDto>, ApiError> {
    let repo = db.drinks();
    let count = repo.count().await?;
    if count == 0 {
        debug!("Catalog is empty, no drink of the day");
        return Ok(None);
    }

    let offset = rng.gen_range(0..count);
    debug!(count, offset, "drink_of_the_day command");

    let drink = match repo.get_at_offset(offset).await? {
        Some(drink) => Some(drink),
        // Rows were deleted between count and fetch.
        None => repo.get_at_offset(0).await?,
    };

    Ok(drink.map(DrinkDto::from))
}

/// Lists drinks matching the given parameters, ascending by name.
///
/// No match is an empty list, not an error.
pub async fn list_drinks(db: &Database, params: &ListParams) -> Result<DrinkList, ApiError> {
    let start = Instant::now();
    let filters = params.validate()?;
    let filter = filters.compile();

    let drinks: Vec<DrinkDto> = db
        .drinks()
        .search(&filter)
        .await?
        .into_iter()
        .map(DrinkDto::from)
        .collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = drinks.len(),
        predicates = filter.predicates().len(),
        "list_drinks complete"
    );

    Ok(DrinkList {
        drinks,
        filters,
        categories: Category::names().into_iter().map(str::to_string).collect(),
    })
}

/// Gets a single drink by id.
pub async fn get_drink(db: &Database, id: &str) -> Result<DrinkDto, ApiError> {
    debug!(id = %id, "get_drink command");

    let drink = db
        .drinks()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::DrinkNotFound(id.to_string()))?;

    Ok(DrinkDto::from(drink))
}

/// Validates the form and creates the drink with a generated id.
pub async fn add_drink(db: &Database, form: &DrinkForm) -> Result<DrinkDto, ApiError> {
    let new_drink = form.validate()?;
    debug!(name = %new_drink.name_es, "add_drink command");

    let drink = db.drinks().create(new_drink).await?;
    info!(id = %drink.id, "Drink added");

    Ok(DrinkDto::from(drink))
}

/// Deletes a drink. A missing id is reported, not an error.
pub async fn delete_drink(db: &Database, id: &str) -> Result<DeleteOutcome, ApiError> {
    if db.drinks().delete(id).await? {
        info!(id = %id, "Drink deleted");
        Ok(DeleteOutcome::Deleted)
    } else {
        warn!(id = %id, "Delete requested for unknown drink");
        Ok(DeleteOutcome::NotFound)
    }
}
