//! Record abstraction shared by every entity kind
//!
//! The query layer never looks at concrete record types. It goes through
//! [`Record`], which exposes:
//! - the integer id used by lookups
//! - the fixed set of text fields used by free-text search
//! - named field access used by equality filters and top-N ranking

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The three collections held by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Portfolio companies
    Companies,
    /// Venture capital firms
    Vcs,
    /// News articles
    News,
}

impl RecordKind {
    /// Get the string representation of the record kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Companies => "companies",
            RecordKind::Vcs => "vcs",
            RecordKind::News => "news",
        }
    }

    /// Get all record kinds
    pub fn all() -> &'static [RecordKind] {
        &[RecordKind::Companies, RecordKind::Vcs, RecordKind::News]
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "companies" | "company" | "startups" => Ok(RecordKind::Companies),
            "vcs" | "vc" | "investors" | "investor" | "firms" => Ok(RecordKind::Vcs),
            "news" | "articles" | "article" => Ok(RecordKind::News),
            _ => Err(Error::InvalidValue(format!("Unknown record kind: {}", s))),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A borrowed view of one named field of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Int(u64),
    Float(f64),
    Bool(bool),
    List(&'a [String]),
    /// Unknown field name, or an optional field with no value
    Missing,
}

impl FieldValue<'_> {
    /// Exact equality against a raw filter value.
    ///
    /// Text compares verbatim, numbers and booleans compare after parsing the
    /// raw value, lists match when any element is equal.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            FieldValue::Text(s) => *s == raw,
            FieldValue::Int(n) => raw.trim().parse::<u64>().is_ok_and(|v| v == *n),
            FieldValue::Float(x) => raw.trim().parse::<f64>().is_ok_and(|v| v == *x),
            FieldValue::Bool(b) => parse_bool(raw).is_some_and(|v| v == *b),
            FieldValue::List(items) => items.iter().any(|item| item == raw),
            FieldValue::Missing => false,
        }
    }

    /// Numeric view used for ranking
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(x) => Some(*x),
            _ => None,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Common read-only surface of companies, VCs and news articles.
pub trait Record {
    /// Collection this record belongs to
    const KIND: RecordKind;

    /// Field names accepted by [`Record::field`]
    const FIELDS: &'static [&'static str];

    /// Unique id within the collection
    fn id(&self) -> u64;

    /// Text fields matched by free-text search
    fn search_fields(&self) -> Vec<&str>;

    /// Look up a field by its serialized name
    fn field(&self, name: &str) -> FieldValue<'_>;
}
