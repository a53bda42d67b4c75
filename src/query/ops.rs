//! Core query operations over a single collection
//!
//! All operations are total: empty collections, unknown ids and unknown
//! field names produce empty or absent results, never errors. Results
//! borrow from the input slice and keep its order unless stated otherwise.

use crate::record::{FieldValue, Record};
use std::cmp::Ordering;

/// Exact match on the integer id
pub fn get_by_id<T: Record>(records: &[T], id: u64) -> Option<&T> {
    records.iter().find(|r| r.id() == id)
}

/// Exact equality filter on a named field.
///
/// An empty `value` returns the whole collection unfiltered.
pub fn filter_by_field<'a, T: Record>(records: &'a [T], field: &str, value: &str) -> Vec<&'a T> {
    if value.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| r.field(field).matches(value))
        .collect()
}

/// Case-insensitive substring search across the record's search fields.
///
/// A record matches when any one of its fields contains the query.
pub fn search<'a, T: Record>(records: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// First `n` records by a numeric field, descending.
///
/// The sort is stable, so ties keep collection order. Records without a
/// numeric value for `field` rank after those with one.
pub fn top_n_by_field<'a, T: Record>(records: &'a [T], field: &str, n: usize) -> Vec<&'a T> {
    let mut ranked: Vec<&T> = records.iter().collect();
    ranked.sort_by(|a, b| descending(a.field(field), b.field(field)));
    ranked.truncate(n);
    ranked
}

/// Integers compare exactly; anything involving a float goes through f64
fn descending(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    if let (FieldValue::Int(a), FieldValue::Int(b)) = (a, b) {
        return b.cmp(&a);
    }
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
