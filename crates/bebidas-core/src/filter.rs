//! # Filter Compiler
//!
//! Combines the optional listing parameters into one predicate over drinks.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DrinkQuery { q, country, category, abv_min, abv_max }                 │
//! │       │  compile()                                                      │
//! │       ▼                                                                 │
//! │  DrinkFilter = AND of:                                                 │
//! │    q        → TextAny   name_es ∪ origin_country ∪ fun_fact_es         │
//! │    country  → Contains  origin_country                                 │
//! │    category → Equals    category                                       │
//! │    abv_min  → AbvAtLeast / AbvAtLeastOrUnknown                         │
//! │    abv_max  → AbvAtMost  / AbvUnknown                                  │
//! │       │                                                                 │
//! │       ├──► matches(&Drink)   in-memory evaluation                      │
//! │       └──► bebidas-db        one SQL WHERE clause                      │
//! │                                                                         │
//! │  Results are ordered ascending by name_es.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Zero Bounds
//! A zero bound is a business rule, not a numeric comparison:
//! - `abv_min = 0` widens: drinks with unknown abv count as well.
//! - `abv_max = 0` narrows: only drinks with unknown abv qualify, so a drink
//!   stored with `abv = 0.0` is excluded.
//!
//! ## Case Folding
//! The needle is lowercased with full Unicode rules, so `"PERÚ"` becomes
//! `"perú"`. Stored fields fold ASCII case only, which is what SQLite's
//! `lower()` does. Accents are compared as-is: `"café"` does not match
//! `"Cafe"`.

use serde::{Deserialize, Serialize};

use crate::types::{Category, Drink};

// =============================================================================
// Query Parameters
// =============================================================================

/// Listing parameters, already trimmed and parsed by the input boundary.
///
/// `None` means the filter was not requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrinkQuery {
    /// Free text matched against name, country and fun fact.
    pub q: Option<String>,
    /// Free text matched against the country only.
    pub country: Option<String>,
    pub category: Option<Category>,
    pub abv_min: Option<f64>,
    pub abv_max: Option<f64>,
}

impl DrinkQuery {
    /// Compiles the parameters into a conjunction of predicates.
    ///
    /// ## Example
    /// ```rust
    /// use bebidas_core::{DrinkQuery, Predicate};
    ///
    /// let query = DrinkQuery { abv_max: Some(0.0), ..Default::default() };
    /// assert_eq!(query.compile().predicates(), &[Predicate::AbvUnknown]);
    /// ```
    pub fn compile(&self) -> DrinkFilter {
        let mut predicates = Vec::new();

        if let Some(q) = non_empty(&self.q) {
            predicates.push(Predicate::TextAny {
                needle: fold_needle(q),
            });
        }
        if let Some(country) = non_empty(&self.country) {
            predicates.push(Predicate::CountryContains {
                needle: fold_needle(country),
            });
        }
        if let Some(category) = self.category {
            predicates.push(Predicate::CategoryIs(category));
        }
        if let Some(min) = self.abv_min {
            predicates.push(AbvMin::from_param(min).predicate());
        }
        if let Some(max) = self.abv_max {
            predicates.push(AbvMax::from_param(max).predicate());
        }

        DrinkFilter { predicates }
    }

    /// True when no filter was requested.
    pub fn is_empty(&self) -> bool {
        self.compile().is_empty()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Lowercases a search needle.
pub fn fold_needle(text: &str) -> String {
    text.to_lowercase()
}

/// Lowercases ASCII letters only, like SQLite's `lower()`.
pub fn fold_case(text: &str) -> String {
    text.to_ascii_lowercase()
}

// =============================================================================
// ABV Bounds
// =============================================================================

/// Interpretation of the `abv_min` parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbvMin {
    /// `abv_min = 0`: any known abv, or unknown.
    ZeroOrUnknown,
    /// `abv >= value`; unknown excluded.
    AtLeast(f64),
}

impl AbvMin {
    pub fn from_param(value: f64) -> Self {
        if value == 0.0 {
            AbvMin::ZeroOrUnknown
        } else {
            AbvMin::AtLeast(value)
        }
    }

    pub fn predicate(self) -> Predicate {
        match self {
            AbvMin::ZeroOrUnknown => Predicate::AbvAtLeastOrUnknown(0.0),
            AbvMin::AtLeast(min) => Predicate::AbvAtLeast(min),
        }
    }
}

/// Interpretation of the `abv_max` parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbvMax {
    /// `abv_max = 0`: strictly non-alcoholic, i.e. unknown abv only.
    UnknownOnly,
    /// `abv <= value`; unknown excluded.
    AtMost(f64),
}

impl AbvMax {
    pub fn from_param(value: f64) -> Self {
        if value == 0.0 {
            AbvMax::UnknownOnly
        } else {
            AbvMax::AtMost(value)
        }
    }

    pub fn predicate(self) -> Predicate {
        match self {
            AbvMax::UnknownOnly => Predicate::AbvUnknown,
            AbvMax::AtMost(max) => Predicate::AbvAtMost(max),
        }
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// A single condition of a compiled filter.
///
/// Text needles are stored already case-folded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Needle occurs in `name_es`, `origin_country` or `fun_fact_es`.
    TextAny { needle: String },
    /// Needle occurs in `origin_country`.
    CountryContains { needle: String },
    CategoryIs(Category),
    /// `abv >= min`, or abv unknown.
    AbvAtLeastOrUnknown(f64),
    /// `abv >= min`.
    AbvAtLeast(f64),
    /// `abv <= max`.
    AbvAtMost(f64),
    /// abv unknown.
    AbvUnknown,
}

impl Predicate {
    /// Evaluates the predicate against one drink.
    pub fn matches(&self, drink: &Drink) -> bool {
        match self {
            Predicate::TextAny { needle } => {
                contains_folded(&drink.name_es, needle)
                    || contains_folded(&drink.origin_country, needle)
                    || drink
                        .fun_fact_es
                        .as_deref()
                        .is_some_and(|fact| contains_folded(fact, needle))
            }
            Predicate::CountryContains { needle } => {
                contains_folded(&drink.origin_country, needle)
            }
            Predicate::CategoryIs(category) => drink.category == *category,
            Predicate::AbvAtLeastOrUnknown(min) => drink.abv.map_or(true, |abv| abv >= *min),
            Predicate::AbvAtLeast(min) => drink.abv.is_some_and(|abv| abv >= *min),
            Predicate::AbvAtMost(max) => drink.abv.is_some_and(|abv| abv <= *max),
            Predicate::AbvUnknown => drink.abv.is_none(),
        }
    }
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    fold_case(haystack).contains(folded_needle)
}

// =============================================================================
// Compiled Filter
// =============================================================================

/// Conjunction of predicates. An empty filter matches every drink.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrinkFilter {
    predicates: Vec<Predicate>,
}

impl DrinkFilter {
    /// Filter that matches everything.
    pub fn all() -> Self {
        DrinkFilter::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, drink: &Drink) -> bool {
        self.predicates.iter().all(|p| p.matches(drink))
    }

    /// Keeps matching drinks, sorted ascending by `name_es`.
    ///
    /// Names compare byte-wise, like SQLite's default `BINARY` collation.
    /// Equal names fall back to `id` so the order is total.
    pub fn apply(&self, drinks: impl IntoIterator<Item = Drink>) -> Vec<Drink> {
        let mut matched: Vec<Drink> = drinks.into_iter().filter(|d| self.matches(d)).collect();
        matched.sort_by(|a, b| a.name_es.cmp(&b.name_es).then_with(|| a.id.cmp(&b.id)));
        matched
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewDrink, ServeTemp};

    fn drink(
        id: &str,
        name: &str,
        country: &str,
        category: Category,
        abv: Option<f64>,
        fact: Option<&str>,
    ) -> Drink {
        Drink::from_new(
            id,
            NewDrink {
                name_es: name.to_string(),
                origin_country: country.to_string(),
                category,
                abv,
                serve_temp: ServeTemp::Cold,
                fun_fact_es: fact.map(str::to_string),
                image_url: None,
            },
        )
    }

    fn catalog() -> Vec<Drink> {
        vec![
            drink("mate", "Mate", "Argentina", Category::Tradition, None, Some("National drink")),
            drink("cafe", "Café", "Colombia", Category::Coffee, None, None),
            drink("pisco-sour", "Pisco Sour", "Perú", Category::Alcohol, Some(14.0), None),
            drink("malta", "Malta", "Venezuela", Category::Soft, Some(0.0), None),
            drink("cerveza", "Cerveza Quilmes", "Argentina", Category::Alcohol, Some(4.9), Some("Since 1890")),
        ]
    }

    fn ids(drinks: &[Drink]) -> Vec<&str> {
        drinks.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_matches_all_sorted_by_name() {
        let result = DrinkQuery::default().compile().apply(catalog());
        assert_eq!(
            ids(&result),
            vec!["cafe", "cerveza", "malta", "mate", "pisco-sour"]
        );
    }

    #[test]
    fn test_blank_text_params_are_ignored() {
        let query = DrinkQuery {
            q: Some(String::new()),
            country: Some(String::new()),
            ..Default::default()
        };
        assert!(query.compile().is_empty());
        assert!(query.is_empty());
    }

    #[test]
    fn test_q_matches_country_case_insensitively() {
        let query = DrinkQuery {
            q: Some("argentina".to_string()),
            ..Default::default()
        };
        let result = query.compile().apply(catalog());
        assert_eq!(ids(&result), vec!["cerveza", "mate"]);
    }

    #[test]
    fn test_q_is_accent_sensitive() {
        let two = vec![catalog()[0].clone(), catalog()[1].clone()];

        let query = DrinkQuery {
            q: Some("café".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(two.clone())), vec!["cafe"]);

        let query = DrinkQuery {
            q: Some("argentina".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(two.clone())), vec!["mate"]);

        let query = DrinkQuery {
            q: Some("cafe".to_string()),
            ..Default::default()
        };
        assert!(query.compile().apply(two).is_empty());
    }

    #[test]
    fn test_uppercase_accented_needles_match() {
        let query = DrinkQuery {
            q: Some("PERÚ".to_string()),
            ..Default::default()
        };
        let filter = query.compile();
        assert_eq!(
            filter.predicates(),
            &[Predicate::TextAny {
                needle: "perú".to_string()
            }]
        );
        assert_eq!(ids(&filter.apply(catalog())), vec!["pisco-sour"]);

        let mexico = vec![drink("horchata", "Horchata", "México", Category::Tradition, None, None)];
        let query = DrinkQuery {
            country: Some("MÉXICO".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(mexico)), vec!["horchata"]);
    }

    #[test]
    fn test_q_matches_fun_fact_and_skips_missing_fact() {
        let query = DrinkQuery {
            q: Some("NATIONAL".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(catalog())), vec!["mate"]);
    }

    #[test]
    fn test_country_filter_only_checks_country() {
        let query = DrinkQuery {
            country: Some("ARG".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(catalog())), vec!["cerveza", "mate"]);

        let query = DrinkQuery {
            country: Some("national".to_string()),
            ..Default::default()
        };
        assert!(query.compile().apply(catalog()).is_empty());
    }

    #[test]
    fn test_category_is_exact() {
        let query = DrinkQuery {
            category: Some(Category::Alcohol),
            ..Default::default()
        };
        assert_eq!(
            ids(&query.compile().apply(catalog())),
            vec!["cerveza", "pisco-sour"]
        );
    }

    #[test]
    fn test_abv_min_zero_includes_unknown_and_zero() {
        let query = DrinkQuery {
            abv_min: Some(0.0),
            ..Default::default()
        };
        let result = query.compile().apply(catalog());
        assert_eq!(result.len(), catalog().len());
        assert!(ids(&result).contains(&"mate"));
        assert!(ids(&result).contains(&"malta"));
    }

    #[test]
    fn test_abv_min_positive_excludes_unknown() {
        let query = DrinkQuery {
            abv_min: Some(5.0),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(catalog())), vec!["pisco-sour"]);
    }

    #[test]
    fn test_abv_max_zero_keeps_only_unknown() {
        let query = DrinkQuery {
            abv_max: Some(0.0),
            ..Default::default()
        };
        let result = query.compile().apply(catalog());
        assert_eq!(ids(&result), vec!["cafe", "mate"]);
        assert!(!ids(&result).contains(&"malta"));
    }

    #[test]
    fn test_abv_max_positive_includes_zero_and_bound() {
        let query = DrinkQuery {
            abv_max: Some(4.9),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(catalog())), vec!["cerveza", "malta"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let query = DrinkQuery {
            q: Some("argentina".to_string()),
            category: Some(Category::Alcohol),
            abv_min: Some(1.0),
            abv_max: Some(10.0),
            ..Default::default()
        };
        let filter = query.compile();
        assert_eq!(filter.predicates().len(), 4);
        assert_eq!(ids(&filter.apply(catalog())), vec!["cerveza"]);
    }

    #[test]
    fn test_zero_bounds_together_match_unknown_only() {
        let query = DrinkQuery {
            abv_min: Some(0.0),
            abv_max: Some(0.0),
            ..Default::default()
        };
        assert_eq!(ids(&query.compile().apply(catalog())), vec!["cafe", "mate"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = DrinkQuery {
            country: Some("a".to_string()),
            ..Default::default()
        }
        .compile();
        let once = filter.apply(catalog());
        let twice = filter.apply(catalog());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ordering_is_byte_wise() {
        let drinks = vec![
            drink("b", "agua", "X", Category::Soft, None, None),
            drink("a", "Zumo", "X", Category::Soft, None, None),
            drink("c", "Álamo", "X", Category::Soft, None, None),
        ];
        let result = DrinkFilter::all().apply(drinks);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_compiled_zero_bounds() {
        assert_eq!(AbvMin::from_param(0.0), AbvMin::ZeroOrUnknown);
        assert_eq!(AbvMin::from_param(-0.0), AbvMin::ZeroOrUnknown);
        assert_eq!(AbvMax::from_param(0.0), AbvMax::UnknownOnly);
        assert_eq!(AbvMax::from_param(2.5), AbvMax::AtMost(2.5));
    }
}
