//! Offer ordering
//!
//! `sort_by` is a stable merge sort, so equal keys keep collection order in
//! both directions.

use std::cmp::Ordering;

use shared::offer::query::constraint;
use shared::offer::{Offer, OfferQuery, OfferSort, SortDirection, SortKey};
use shared::{AppError, AppResult};

/// Sort a view in place
pub fn sort_offers(view: &mut [&Offer], sort: OfferSort) {
    view.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort.key);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Read `sortBy` / `sortOrder` from raw query state
///
/// Absent, `""` and `"all"` fall back to the default order.
pub fn sort_from_query(query: &OfferQuery) -> AppResult<OfferSort> {
    let key = match constraint(&query.sort_by) {
        None => SortKey::default(),
        Some(raw) => SortKey::parse(raw).ok_or_else(|| {
            AppError::invalid_request(format!("Unknown sort key: {}", raw)).with_detail("sortBy", raw)
        })?,
    };
    let direction = match constraint(&query.sort_order) {
        None => SortDirection::default(),
        Some(raw) => SortDirection::parse(raw).ok_or_else(|| {
            AppError::invalid_request(format!("Unknown sort order: {}", raw))
                .with_detail("sortOrder", raw)
        })?,
    };
    Ok(OfferSort { key, direction })
}

fn compare_by(a: &Offer, b: &Offer, key: SortKey) -> Ordering {
    match key {
        SortKey::Importe => a.importe.total_cmp(&b.importe),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::VenceEl => a.vence_el.cmp(&b.vence_el),
        SortKey::ClienteNombre => collate(&a.client.name, &b.client.name),
        SortKey::PropertyTitle => collate(&a.property.title, &b.property.title),
        SortKey::Estado => collate(a.estado.as_str(), b.estado.as_str()),
    }
}

/// Locale-style comparison: case-insensitive, accents folded onto the base
/// letter, `ñ` sorted right after `n`.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(s: &str) -> Vec<(char, u8)> {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' => ('a', 0),
            'é' | 'è' | 'ë' | 'ê' => ('e', 0),
            'í' | 'ì' | 'ï' | 'î' => ('i', 0),
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => ('o', 0),
            'ú' | 'ù' | 'ü' | 'û' => ('u', 0),
            'ç' => ('c', 0),
            'ñ' => ('n', 1),
            other => (other, 0),
        })
        .collect()
}
