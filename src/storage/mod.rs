//! Storage Layer - SQLite-backed preferences
//!
//! Holds the small amount of state the dashboard keeps between sessions in a
//! single key-value table:
//! - `theme`: `light` or `dark`
//! - `recentSearches`: JSON array of the latest search queries

pub mod schema;
pub mod sqlite;

pub use sqlite::{PrefsStore, ThemePreference, MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY, THEME_KEY};
