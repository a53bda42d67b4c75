//! SQLite storage implementation

use super::schema;
use crate::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Preference key of the colour theme
pub const THEME_KEY: &str = "theme";

/// Preference key of the recent-search list
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// Length cap of the recent-search list
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Dashboard colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

impl FromStr for ThemePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            _ => Err(Error::InvalidValue(format!("Unknown theme: {}", s))),
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// SQLite-backed preference storage
pub struct PrefsStore {
    conn: Connection,
}

impl PrefsStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing and offline sessions)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Raw key-value access ==========

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert or replace a value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a key; returns whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }

    // ========== Theme ==========

    /// Stored theme; light when unset or unreadable
    pub fn theme(&self) -> Result<ThemePreference> {
        Ok(self
            .get(THEME_KEY)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_theme(&self, theme: ThemePreference) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }

    /// Flip the theme and return the new value
    pub fn toggle_theme(&self) -> Result<ThemePreference> {
        let next = self.theme()?.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    // ========== Recent searches ==========

    /// Stored searches, most recent first; empty when unset or unreadable
    pub fn recent_searches(&self) -> Result<Vec<String>> {
        let Some(raw) = self.get(RECENT_SEARCHES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable recent searches");
                Ok(Vec::new())
            }
        }
    }

    /// Put `query` at the front of the recent-search list.
    ///
    /// The query is trimmed; blank queries are ignored. An equal earlier
    /// entry is moved rather than duplicated, and the list is capped at
    /// [`MAX_RECENT_SEARCHES`].
    pub fn record_search(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        let mut searches = self.recent_searches()?;
        if query.is_empty() {
            return Ok(searches);
        }

        searches.retain(|s| s != query);
        searches.insert(0, query.to_string());
        searches.truncate(MAX_RECENT_SEARCHES);

        self.set(RECENT_SEARCHES_KEY, &serde_json::to_string(&searches)?)?;
        Ok(searches)
    }

    pub fn clear_recent_searches(&self) -> Result<()> {
        self.remove(RECENT_SEARCHES_KEY)?;
        Ok(())
    }
}
