//! # Identifier Generation
//!
//! Turns a free-text display name into a URL-safe, human-readable key.
//!
//! ## Pipeline
//! ```text
//! "Café con Leche"
//!      │  NFKD + drop combining marks
//!      ▼
//! "Cafe con Leche"
//!      │  keep [A-Za-z0-9], whitespace, '_', '-'; trim; lowercase
//!      ▼
//! "cafe con leche"
//!      │  whitespace / '_' runs → '-'
//!      ▼
//! "cafe-con-leche"   (empty → "drink")
//!      │  collision check against the store
//!      ▼
//! "cafe-con-leche" | "cafe-con-leche-2" | "cafe-con-leche-3" | ...
//! ```
//!
//! Both functions are pure. Uniqueness depends on what the store holds at
//! call time, so the caller supplies the lookup and must not cache results.

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

use crate::FALLBACK_SLUG;

/// Builds the base slug for a name.
///
/// ## Example
/// ```rust
/// use bebidas_core::slug::slugify;
///
/// assert_eq!(slugify("Café con Leche"), "cafe-con-leche");
/// assert_eq!(slugify("Piña_Colada"), "pina-colada");
/// assert_eq!(slugify("!!!"), "drink");
/// ```
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
        .collect();
    let folded = folded.trim().to_lowercase();

    let mut slug = String::with_capacity(folded.len());
    let mut in_gap = false;
    for c in folded.chars() {
        if c.is_whitespace() || c == '_' {
            if !in_gap {
                slug.push('-');
                in_gap = true;
            }
        } else {
            slug.push(c);
            in_gap = false;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Candidate identifiers for a base slug: `base`, `base-2`, `base-3`, ...
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((2u64..).map(move |n| format!("{base}-{n}")))
}

/// Derives a unique identifier for `name`.
///
/// `exists` reports whether an identifier is already taken in the store.
/// The first candidate for which it returns `false` is the result.
///
/// ## Example
/// ```rust
/// use std::collections::HashSet;
/// use bebidas_core::slug::unique_id_from;
///
/// let mut store = HashSet::new();
/// for _ in 0..3 {
///     let id = unique_id_from("Mate", |c| store.contains(c));
///     store.insert(id);
/// }
/// assert!(store.contains("mate"));
/// assert!(store.contains("mate-2"));
/// assert!(store.contains("mate-3"));
/// ```
pub fn unique_id_from(name: &str, mut exists: impl FnMut(&str) -> bool) -> String {
    let base = slugify(name);
    // The store is finite, so some candidate is always free.
    let free = candidates(&base).find(|candidate| !exists(candidate));
    free.unwrap_or(base)
}

// =============================================================================
// Unit Tests
// =============================================================================
