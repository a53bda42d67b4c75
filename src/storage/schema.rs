//! Database schema definitions

/// SQL to create the preferences table
///
/// One row per preference key. Values are stored as text; structured
/// values (the recent-search list) are JSON encoded.
pub const CREATE_PREFERENCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_PREFERENCES_TABLE]
}
