//! # Dealboard - Company, Investor and News Intelligence
//!
//! Data layer behind the partner-program dashboards (biotech and digital
//! natives skins).
//!
//! Dealboard provides:
//! - Typed records for companies, VC firms and news articles
//! - A record store loaded once from a live backend, with an embedded fallback dataset
//! - A pure query layer (lookup, filter, search, top-N, aggregate statistics)
//! - SQLite-backed preferences (theme, recent searches)
//! - A read-only JSON API over the loaded store

pub mod record;
pub mod company;
pub mod investor;
pub mod article;
pub mod source;
pub mod store;
pub mod query;
pub mod storage;
pub mod server;
pub mod format;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::{FieldValue, Record, RecordKind};
pub use company::{Company, PartnerStatus};
pub use investor::Vc;
pub use article::{NewsArticle, NewsCategory};
pub use source::{HttpSource, RecordSource, Skin};
pub use store::{LoadOrigin, LoadedStore, RecordStore};
pub use query::QueryEngine;
pub use storage::PrefsStore;

/// Result type alias for Dealboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Dealboard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}) from {url}")]
    Api { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
