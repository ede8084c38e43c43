//! Plain-text rendering of command results.
//!
//! `--json` output bypasses this module and serializes the DTOs directly.

use std::fmt::Write;

use crate::commands::{DeleteOutcome, DrinkDto, DrinkList};

/// Shown by `today` when the catalog has no drinks.
pub const EMPTY_CATALOG: &str =
    "El catálogo está vacío. Agrega una bebida con `bebidas add`.";

/// Full detail view of one drink.
pub fn drink_card(drink: &DrinkDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", drink.name_es, drink.id);
    let _ = writeln!(out, "  País:        {}", drink.origin_country);
    let _ = writeln!(out, "  Categoría:   {}", drink.category);
    let _ = writeln!(out, "  Graduación:  {}", format_abv(drink.abv));
    let _ = writeln!(out, "  Se sirve:    {}", drink.serve_temp_label);
    if let Some(fact) = &drink.fun_fact_es {
        let _ = writeln!(out, "  Dato:        {}", fact);
    }
    if let Some(url) = &drink.image_url {
        let _ = writeln!(out, "  Imagen:      {}", url);
    }
    out
}

/// One line per drink, preceded by the active filters.
pub fn drink_list(list: &DrinkList) -> String {
    let mut out = String::new();

    let filters = describe_filters(list);
    if !filters.is_empty() {
        let _ = writeln!(out, "Filtros: {}", filters.join(", "));
    }

    if list.drinks.is_empty() {
        let _ = writeln!(out, "Sin resultados.");
        return out;
    }

    let width = list
        .drinks
        .iter()
        .map(|d| d.name_es.chars().count())
        .max()
        .unwrap_or(0);

    for drink in &list.drinks {
        let pad = width - drink.name_es.chars().count();
        let _ = writeln!(
            out,
            "{}{}  {:<10} {:<9} {:>6}  [{}]",
            drink.name_es,
            " ".repeat(pad),
            drink.origin_country,
            drink.category.as_str(),
            format_abv(drink.abv),
            drink.id,
        );
    }
    let _ = writeln!(out, "{} bebida(s)", list.drinks.len());
    out
}

/// Message for a finished delete.
pub fn delete_outcome(id: &str, outcome: DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted => format!("Eliminada: {}", id),
        DeleteOutcome::NotFound => format!("No existe una bebida con id '{}'", id),
    }
}

fn format_abv(abv: Option<f64>) -> String {
    match abv {
        Some(abv) => format!("{}%", abv),
        None => "—".to_string(),
    }
}

fn describe_filters(list: &DrinkList) -> Vec<String> {
    let f = &list.filters;
    let mut parts = Vec::new();
    if let Some(q) = &f.q {
        parts.push(format!("q=\"{}\"", q));
    }
    if let Some(country) = &f.country {
        parts.push(format!("país=\"{}\"", country));
    }
    if let Some(category) = f.category {
        parts.push(format!("categoría={}", category));
    }
    if let Some(min) = f.abv_min {
        parts.push(format!("abv≥{}", min));
    }
    if let Some(max) = f.abv_max {
        parts.push(format!("abv≤{}", max));
    }
    parts
}
