//! Presentation helpers shared by the CLI and API consumers

use chrono::{DateTime, Utc};

/// Compact dollar amount: `$1.2B`, `$45.0M`, `$12.5K`, `$950`
pub fn format_currency(amount: u64) -> String {
    const UNITS: [(u64, &str); 3] = [
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for (scale, suffix) in UNITS {
        if amount >= scale {
            return format!("${:.1}{}", amount as f64 / scale as f64, suffix);
        }
    }
    format!("${}", amount)
}

/// Short calendar date, e.g. `Sep 20, 2024`
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}
