//! # Seeding
//!
//! Provisioning of the initial catalog.
//!
//! ## Startup Sequence
//! ```text
//! Database::new(config)        ← schema via migrations
//!      │
//!      ▼
//! seed_if_empty(&db, &drinks)  ← only when the drinks table has no rows
//!      │
//!      ▼
//! commands run
//! ```
//!
//! Seed files are a JSON array of drinks that already carry their ids.
//! Unknown keys are ignored, so older seed files with extra columns load.

use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::drink::insert_row;
use bebidas_core::Drink;

/// The catalog bundled with the binaries.
pub const DEFAULT_SEED: &str = include_str!("../../../seeds/drinks.json");

/// Parses a JSON array of drinks.
///
/// ## Errors
/// * `DbError::Seed` - not valid JSON, or two entries share an id
pub fn load_seed(json: &str) -> DbResult<Vec<Drink>> {
    let drinks: Vec<Drink> = serde_json::from_str(json)?;

    let mut ids = std::collections::HashSet::new();
    if let Some(dup) = drinks.iter().find(|d| !ids.insert(d.id.as_str())) {
        return Err(DbError::Seed(format!("duplicate id '{}'", dup.id)));
    }

    debug!(count = drinks.len(), "Loaded seed drinks");
    Ok(drinks)
}

/// Parses [`DEFAULT_SEED`].
pub fn default_seed() -> DbResult<Vec<Drink>> {
    load_seed(DEFAULT_SEED)
}

/// Inserts `drinks` if the catalog is empty.
///
/// Returns how many drinks were inserted; `0` when the catalog already had
/// rows. Runs in one transaction, so a failing row leaves the store empty.
pub async fn seed_if_empty(db: &Database, drinks: &[Drink]) -> DbResult<usize> {
    let existing = db.drinks().count().await?;
    if existing > 0 {
        debug!(existing, "Catalog already populated, skipping seed");
        return Ok(0);
    }

    let inserted = insert_all(db, drinks).await?;
    info!(inserted, "Seeded empty catalog");
    Ok(inserted)
}

/// Inserts every seed drink whose id is not present yet.
///
/// Existing rows are left untouched. Returns how many drinks were inserted.
pub async fn seed_missing(db: &Database, drinks: &[Drink]) -> DbResult<usize> {
    let repo = db.drinks();
    let mut missing = Vec::new();
    for drink in drinks {
        if !repo.exists(&drink.id).await? {
            missing.push(drink.clone());
        }
    }

    if missing.len() < drinks.len() {
        warn!(
            skipped = drinks.len() - missing.len(),
            "Some seed drinks already exist"
        );
    }

    insert_all(db, &missing).await
}

async fn insert_all(db: &Database, drinks: &[Drink]) -> DbResult<usize> {
    let mut tx = db
        .pool()
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    for drink in drinks {
        insert_row(&mut tx, drink).await?;
    }

    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    Ok(drinks.len())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use bebidas_core::slug::slugify;
    use bebidas_core::Category;

    #[test]
    fn test_default_seed_parses() {
        let drinks = default_seed().unwrap();
        assert!(drinks.len() >= 10);
        for category in Category::ALL {
            assert!(drinks.iter().any(|d| d.category == category));
        }
        for drink in &drinks {
            assert_eq!(drink.id, slugify(&drink.name_es));
        }
    }

    #[test]
    fn test_load_seed_ignores_unknown_keys() {
        let json = r#"[{
            "id": "mate",
            "name_es": "Mate",
            "name_en": "Mate",
            "scene": "mañana",
            "origin_country": "Argentina",
            "category": "tradition",
            "serve_temp": "hot"
        }]"#;

        let drinks = load_seed(json).unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].abv, None);
        assert_eq!(drinks[0].fun_fact_es, None);
    }

    #[test]
    fn test_load_seed_rejects_bad_input() {
        assert!(matches!(load_seed("not json"), Err(DbError::Seed(_))));

        let bad_category = r#"[{"id": "x", "name_es": "X", "origin_country": "Y",
            "category": "beer", "serve_temp": "cold"}]"#;
        assert!(matches!(load_seed(bad_category), Err(DbError::Seed(_))));

        let dup = r#"[
            {"id": "x", "name_es": "X", "origin_country": "Y", "category": "soft", "serve_temp": "cold"},
            {"id": "x", "name_es": "X", "origin_country": "Z", "category": "soft", "serve_temp": "cold"}
        ]"#;
        assert!(matches!(load_seed(dup), Err(DbError::Seed(_))));
    }

    #[tokio::test]
    async fn test_seed_if_empty_only_seeds_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drinks = default_seed().unwrap();

        assert_eq!(seed_if_empty(&db, &drinks).await.unwrap(), drinks.len());
        assert_eq!(seed_if_empty(&db, &drinks).await.unwrap(), 0);
        assert_eq!(db.drinks().count().await.unwrap(), drinks.len() as i64);
    }

    #[tokio::test]
    async fn test_seed_missing_restores_deleted_drinks() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drinks = default_seed().unwrap();
        seed_if_empty(&db, &drinks).await.unwrap();

        assert!(db.drinks().delete("mate").await.unwrap());
        assert_eq!(seed_missing(&db, &drinks).await.unwrap(), 1);
        assert!(db.drinks().exists("mate").await.unwrap());
        assert_eq!(seed_missing(&db, &drinks).await.unwrap(), 0);
    }
}
