//! # Drink Repository
//!
//! Database operations for drinks.
//!
//! ## Key Operations
//! - Lookup by id, count, stable offset access (drink of the day)
//! - Filtered listing: a compiled [`DrinkFilter`] becomes one `WHERE` clause
//! - Create with atomic slug assignment, delete
//!
//! ## Filter → SQL
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Predicate                    SQL (all values bound, never inlined)     │
//! │  ───────────────────────────  ─────────────────────────────────────    │
//! │  TextAny { needle }           (instr(lower(name_es), ?) > 0            │
//! │                                OR instr(lower(origin_country), ?) > 0  │
//! │                                OR instr(lower(fun_fact_es), ?) > 0)    │
//! │  CountryContains { needle }   instr(lower(origin_country), ?) > 0      │
//! │  CategoryIs(c)                category = ?                             │
//! │  AbvAtLeastOrUnknown(min)     (abv >= ? OR abv IS NULL)                │
//! │  AbvAtLeast(min)              abv >= ?                                 │
//! │  AbvAtMost(max)               abv <= ?                                 │
//! │  AbvUnknown                   abv IS NULL                              │
//! │                                                                         │
//! │  joined with AND, then ORDER BY name_es ASC, id ASC                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! `instr` is used instead of `LIKE` so `%` and `_` in user text stay literal.
//!
//! ## Id Assignment
//! ```text
//! pool.begin_with("BEGIN IMMEDIATE")  ← takes the write lock up front
//!   SELECT taken ids for slug        ← snapshot for unique_id_from
//!   INSERT drink                     ← PRIMARY KEY still enforces uniqueness
//! tx.commit()                        ← on UNIQUE violation: rollback and retry
//!                                      any other error: dropped tx rolls back
//! ```

use std::collections::HashSet;

use sqlx::sqlite::SqliteConnection;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use bebidas_core::slug::{slugify, unique_id_from};
use bebidas_core::{Drink, DrinkFilter, NewDrink, Predicate};

/// How many times `create` retries after losing an id race.
const MAX_ID_ATTEMPTS: u32 = 3;

const SELECT_DRINKS: &str = "SELECT id, name_es, origin_country, category, abv, serve_temp, \
                             fun_fact_es, image_url FROM drinks";

/// Repository for drink database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.drinks();
///
/// let drink = repo.create(new_drink).await?;
/// let found = repo.get_by_id(&drink.id).await?;
/// let listed = repo.search(&query.compile()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    /// Creates a new DrinkRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DrinkRepository { pool }
    }

    /// Gets a drink by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Drink))` - Drink found
    /// * `Ok(None)` - No drink with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Drink>> {
        let sql = format!("{SELECT_DRINKS} WHERE id = ?1");
        let drink = sqlx::query_as::<_, Drink>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(drink)
    }

    /// Checks whether an id is taken.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM drinks WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }

    /// Counts all drinks.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drinks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets the drink at position `offset` in a stable (id) order.
    ///
    /// Used to pick the drink of the day: a uniform offset in `[0, count)`
    /// gives a uniform pick. Out-of-range offsets return `None`.
    pub async fn get_at_offset(&self, offset: i64) -> DbResult<Option<Drink>> {
        if offset < 0 {
            return Ok(None);
        }

        let sql = format!("{SELECT_DRINKS} ORDER BY id LIMIT 1 OFFSET ?1");
        let drink = sqlx::query_as::<_, Drink>(&sql)
            .bind(offset)
            .fetch_optional(&self.pool)
            .await?;

        Ok(drink)
    }

    /// Lists drinks matching a compiled filter, ascending by `name_es`.
    ///
    /// An empty filter lists the whole catalog. No match is an empty list,
    /// not an error.
    pub async fn search(&self, filter: &DrinkFilter) -> DbResult<Vec<Drink>> {
        debug!(predicates = filter.predicates().len(), "Searching drinks");

        let mut query = select_where(filter);
        let drinks = query
            .build_query_as::<Drink>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = drinks.len(), "Search returned drinks");
        Ok(drinks)
    }

    /// Lists every drink, ascending by `name_es`.
    pub async fn list_all(&self) -> DbResult<Vec<Drink>> {
        self.search(&DrinkFilter::all()).await
    }

    /// Ids that block `base` as a candidate: `base` itself and `base-*`.
    pub async fn taken_ids(&self, base: &str) -> DbResult<HashSet<String>> {
        let mut conn = self.pool.acquire().await?;
        taken_ids(&mut conn, base).await
    }

    /// Inserts a drink that already has an id.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    /// * `Err(DbError::ConstraintViolation)` - enum or abv CHECK failed
    pub async fn insert(&self, drink: &Drink) -> DbResult<Drink> {
        debug!(id = %drink.id, "Inserting drink");

        let mut conn = self.pool.acquire().await?;
        insert_row(&mut conn, drink).await?;

        Ok(drink.clone())
    }

    /// Creates a drink, deriving its id from `name_es`.
    ///
    /// The taken-id lookup and the insert run in one `BEGIN IMMEDIATE`
    /// transaction, so two writers can't both claim the same candidate.
    /// A UNIQUE violation still triggers a bounded retry. The transaction
    /// rolls back when dropped, so an early return never leaves it open on
    /// the pooled connection.
    pub async fn create(&self, new: NewDrink) -> DbResult<Drink> {
        let base = slugify(&new.name_es);

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let mut tx = self
                .pool
                .begin_with("BEGIN IMMEDIATE")
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            match assign_and_insert(&mut tx, &base, &new).await {
                Ok(drink) => {
                    tx.commit()
                        .await
                        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                    debug!(id = %drink.id, attempt, "Created drink");
                    return Ok(drink);
                }
                Err(err) if err.is_unique_violation() => {
                    tx.rollback()
                        .await
                        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                    warn!(base = %base, attempt, "Id collision while creating drink, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(DbError::duplicate("id", base))
    }

    /// Deletes a drink.
    ///
    /// ## Returns
    /// * `Ok(true)` - Drink deleted
    /// * `Ok(false)` - No drink with that id (nothing changed)
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting drink");

        let result = sqlx::query("DELETE FROM drinks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Query Building
// =============================================================================

/// Builds `SELECT ... WHERE <filter> ORDER BY name_es, id`.
fn select_where(filter: &DrinkFilter) -> QueryBuilder<'static, Sqlite> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_DRINKS);

    for (i, predicate) in filter.predicates().iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(&mut query, predicate);
    }

    query.push(" ORDER BY name_es ASC, id ASC");
    query
}

fn push_predicate(query: &mut QueryBuilder<'static, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::TextAny { needle } => {
            query
                .push("(instr(lower(name_es), ")
                .push_bind(needle.clone())
                .push(") > 0 OR instr(lower(origin_country), ")
                .push_bind(needle.clone())
                .push(") > 0 OR (fun_fact_es IS NOT NULL AND instr(lower(fun_fact_es), ")
                .push_bind(needle.clone())
                .push(") > 0))");
        }
        Predicate::CountryContains { needle } => {
            query
                .push("instr(lower(origin_country), ")
                .push_bind(needle.clone())
                .push(") > 0");
        }
        Predicate::CategoryIs(category) => {
            query.push("category = ").push_bind(*category);
        }
        Predicate::AbvAtLeastOrUnknown(min) => {
            query
                .push("(abv >= ")
                .push_bind(*min)
                .push(" OR abv IS NULL)");
        }
        Predicate::AbvAtLeast(min) => {
            query.push("abv >= ").push_bind(*min);
        }
        Predicate::AbvAtMost(max) => {
            query.push("abv <= ").push_bind(*max);
        }
        Predicate::AbvUnknown => {
            query.push("abv IS NULL");
        }
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================

/// Ids equal to `base` or starting with `base-`.
async fn taken_ids(conn: &mut SqliteConnection, base: &str) -> DbResult<HashSet<String>> {
    let prefix = format!("{base}-");
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT id FROM drinks WHERE id = ?1 OR substr(id, 1, length(?2)) = ?2",
    )
    .bind(base)
    .bind(&prefix)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids.into_iter().collect())
}

async fn assign_and_insert(
    conn: &mut SqliteConnection,
    base: &str,
    new: &NewDrink,
) -> DbResult<Drink> {
    let taken = taken_ids(conn, base).await?;
    let id = unique_id_from(&new.name_es, |candidate| taken.contains(candidate));
    let drink = Drink::from_new(id, new.clone());

    insert_row(conn, &drink).await?;
    Ok(drink)
}

pub(crate) async fn insert_row(conn: &mut SqliteConnection, drink: &Drink) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO drinks (
            id, name_es, origin_country, category,
            abv, serve_temp, fun_fact_es, image_url
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&drink.id)
    .bind(&drink.name_es)
    .bind(&drink.origin_country)
    .bind(drink.category)
    .bind(drink.abv)
    .bind(drink.serve_temp)
    .bind(&drink.fun_fact_es)
    .bind(&drink.image_url)
    .execute(&mut *conn)
    .await
    .map_err(|e| match DbError::from(e) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, drink.id.clone()),
        other => other,
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bebidas_core::{Category, DrinkQuery, ServeTemp};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_drink(name: &str, country: &str, category: Category, abv: Option<f64>) -> NewDrink {
        NewDrink {
            name_es: name.to_string(),
            origin_country: country.to_string(),
            category,
            abv,
            serve_temp: ServeTemp::Cold,
            fun_fact_es: None,
            image_url: None,
        }
    }

    async fn seeded_db() -> Database {
        let db = test_db().await;
        let repo = db.drinks();
        let mut mate = new_drink("Mate", "Argentina", Category::Tradition, None);
        mate.fun_fact_es = Some("National drink".to_string());
        mate.serve_temp = ServeTemp::Hot;
        repo.create(mate).await.unwrap();
        repo.create(new_drink("Café", "Colombia", Category::Coffee, None))
            .await
            .unwrap();
        repo.create(new_drink("Pisco Sour", "Perú", Category::Alcohol, Some(14.0)))
            .await
            .unwrap();
        repo.create(new_drink("Malta", "Venezuela", Category::Soft, Some(0.0)))
            .await
            .unwrap();
        let mut beer = new_drink("Cerveza Quilmes", "Argentina", Category::Alcohol, Some(4.9));
        beer.fun_fact_es = Some("100% de cebada_malteada".to_string());
        repo.create(beer).await.unwrap();
        db
    }

    fn ids(drinks: &[Drink]) -> Vec<&str> {
        drinks.iter().map(|d| d.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_disambiguates() {
        let db = test_db().await;
        let repo = db.drinks();

        let first = repo
            .create(new_drink("Café con Leche", "Colombia", Category::Coffee, None))
            .await
            .unwrap();
        let second = repo
            .create(new_drink("Café con Leche", "Colombia", Category::Coffee, None))
            .await
            .unwrap();
        let third = repo
            .create(new_drink("!!!", "Chile", Category::Soft, None))
            .await
            .unwrap();

        assert_eq!(first.id, "cafe-con-leche");
        assert_eq!(second.id, "cafe-con-leche-2");
        assert_eq!(third.id, "drink");
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_create_reuses_free_base_slot() {
        let db = test_db().await;
        let repo = db.drinks();

        let taken = Drink::from_new("mate-2", new_drink("Mate", "Uruguay", Category::Tradition, None));
        repo.insert(&taken).await.unwrap();
        let cocido = Drink::from_new(
            "mate-cocido",
            new_drink("Mate Cocido", "Paraguay", Category::Tradition, None),
        );
        repo.insert(&cocido).await.unwrap();

        let taken = repo.taken_ids("mate").await.unwrap();
        assert_eq!(taken.len(), 2);
        assert!(taken.contains("mate-2"));

        let created = repo
            .create(new_drink("Mate", "Argentina", Category::Tradition, None))
            .await
            .unwrap();
        assert_eq!(created.id, "mate");

        let again = repo
            .create(new_drink("Maté", "Argentina", Category::Tradition, None))
            .await
            .unwrap();
        assert_eq!(again.id, "mate-3");
    }

    #[tokio::test]
    async fn test_repeated_creates_yield_distinct_ids() {
        let db = test_db().await;
        let repo = db.drinks();

        let mut seen = HashSet::new();
        for name in ["Tereré", "Terere", "TERERÉ", "", "   ", "Tereré"] {
            let drink = repo
                .create(new_drink(name, "Paraguay", Category::Tradition, None))
                .await
                .unwrap();
            assert!(seen.insert(drink.id.clone()), "duplicate id {}", drink.id);
        }
        assert_eq!(repo.count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let db = test_db().await;
        let repo = db.drinks();
        let drink = Drink::from_new("mate", new_drink("Mate", "Argentina", Category::Tradition, None));

        repo.insert(&drink).await.unwrap();
        let err = repo.insert(&drink).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_insert_negative_abv_violates_check() {
        let db = test_db().await;
        let drink = Drink::from_new(
            "vino",
            new_drink("Vino", "Chile", Category::Alcohol, Some(-1.0)),
        );

        let err = db.drinks().insert(&drink).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_connection_usable() {
        // Single connection: a transaction left open would break the next create.
        let db = test_db().await;
        let repo = db.drinks();

        let err = repo
            .create(new_drink("Vino", "Chile", Category::Alcohol, Some(-1.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }));

        let drink = repo
            .create(new_drink("Vino", "Chile", Category::Alcohol, Some(12.0)))
            .await
            .unwrap();
        assert_eq!(drink.id, "vino");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("bebidas.db")).max_connections(4);
        let db = Database::new(config).await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let repo = db.drinks();
                tokio::spawn(async move {
                    repo.create(new_drink("Mate", "Argentina", Category::Tradition, None))
                        .await
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for task in tasks {
            let drink = task.await.unwrap().unwrap();
            assert!(ids.insert(drink.id.clone()), "duplicate id {}", drink.id);
        }

        let expected: HashSet<String> = std::iter::once("mate".to_string())
            .chain((2..=8).map(|n| format!("mate-{n}")))
            .collect();
        assert_eq!(ids, expected);
        assert_eq!(db.drinks().count().await.unwrap(), 8);
        db.close().await;
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let db = seeded_db().await;
        let repo = db.drinks();

        let mate = repo.get_by_id("mate").await.unwrap().unwrap();
        assert_eq!(mate.name_es, "Mate");
        assert_eq!(mate.serve_temp, ServeTemp::Hot);
        assert_eq!(mate.abv, None);
        assert!(repo.exists("mate").await.unwrap());

        assert!(repo.delete("mate").await.unwrap());
        assert!(!repo.delete("mate").await.unwrap());
        assert!(repo.get_by_id("mate").await.unwrap().is_none());
        assert!(!repo.exists("mate").await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_get_at_offset_is_stable_and_bounded() {
        let db = seeded_db().await;
        let repo = db.drinks();
        let count = repo.count().await.unwrap();

        let mut picked = Vec::new();
        for offset in 0..count {
            picked.push(repo.get_at_offset(offset).await.unwrap().unwrap().id);
        }
        assert_eq!(picked, vec!["cafe", "cerveza-quilmes", "malta", "mate", "pisco-sour"]);

        assert!(repo.get_at_offset(count).await.unwrap().is_none());
        assert!(repo.get_at_offset(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_documented_examples() {
        let db = seeded_db().await;
        let repo = db.drinks();

        let query = DrinkQuery {
            q: Some("argentina".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&repo.search(&query.compile()).await.unwrap()),
            vec!["cerveza-quilmes", "mate"]
        );

        let query = DrinkQuery {
            q: Some("café".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&repo.search(&query.compile()).await.unwrap()), vec!["cafe"]);

        let query = DrinkQuery {
            abv_max: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            ids(&repo.search(&query.compile()).await.unwrap()),
            vec!["cafe", "mate"]
        );
    }

    #[tokio::test]
    async fn test_search_uppercase_accented_needles() {
        let db = seeded_db().await;
        let repo = db.drinks();

        let query = DrinkQuery {
            q: Some("PERÚ".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&repo.search(&query.compile()).await.unwrap()), vec!["pisco-sour"]);

        let query = DrinkQuery {
            country: Some("PERÚ".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&repo.search(&query.compile()).await.unwrap()), vec!["pisco-sour"]);

        let query = DrinkQuery {
            q: Some("CAFÉ".to_string()),
            ..Default::default()
        };
        let filter = query.compile();
        let all = repo.list_all().await.unwrap();
        assert_eq!(repo.search(&filter).await.unwrap(), filter.apply(all));
    }

    #[tokio::test]
    async fn test_search_treats_like_wildcards_literally() {
        let db = seeded_db().await;
        let repo = db.drinks();

        let query = DrinkQuery {
            q: Some("100%".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&repo.search(&query.compile()).await.unwrap()),
            vec!["cerveza-quilmes"]
        );

        let query = DrinkQuery {
            q: Some("%".to_string()),
            country: Some("_".to_string()),
            ..Default::default()
        };
        assert!(repo.search(&query.compile()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_agrees_with_in_memory_filter() {
        let db = seeded_db().await;
        let repo = db.drinks();
        let all = repo.list_all().await.unwrap();

        let queries = vec![
            DrinkQuery::default(),
            DrinkQuery {
                q: Some("NATIONAL".to_string()),
                ..Default::default()
            },
            DrinkQuery {
                country: Some("a".to_string()),
                ..Default::default()
            },
            DrinkQuery {
                category: Some(Category::Alcohol),
                ..Default::default()
            },
            DrinkQuery {
                abv_min: Some(0.0),
                ..Default::default()
            },
            DrinkQuery {
                abv_min: Some(4.9),
                abv_max: Some(14.0),
                ..Default::default()
            },
            DrinkQuery {
                abv_min: Some(0.0),
                abv_max: Some(0.0),
                ..Default::default()
            },
            DrinkQuery {
                q: Some("perú".to_string()),
                category: Some(Category::Alcohol),
                abv_max: Some(20.0),
                ..Default::default()
            },
        ];

        for query in queries {
            let filter = query.compile();
            let from_db = repo.search(&filter).await.unwrap();
            let in_memory = filter.apply(all.clone());
            assert_eq!(from_db, in_memory, "mismatch for {query:?}");

            let again = repo.search(&filter).await.unwrap();
            assert_eq!(from_db, again);
        }
    }

    #[test]
    fn test_select_where_sql() {
        let filter = DrinkQuery {
            category: Some(Category::Coffee),
            abv_max: Some(0.0),
            ..Default::default()
        }
        .compile();

        let query = select_where(&filter);
        assert_eq!(
            query.sql(),
            format!("{SELECT_DRINKS} WHERE category = ? AND abv IS NULL ORDER BY name_es ASC, id ASC")
        );

        let query = select_where(&DrinkFilter::all());
        assert_eq!(query.sql(), format!("{SELECT_DRINKS} ORDER BY name_es ASC, id ASC"));
    }
}
