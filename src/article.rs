//! News article records
//!
//! Articles point at a company through `company_id`. The reference is not
//! enforced: it may be absent or name a company that does not exist.

use crate::record::{FieldValue, Record, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reading speed used to derive `read_time` when the source omits it
const WORDS_PER_MINUTE: usize = 200;

/// Coarse classification of the open `category` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Funding,
    Product,
    Partnership,
    Other,
}

impl NewsCategory {
    /// Classify a raw category tag
    pub fn classify(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "funding" => NewsCategory::Funding,
            "product" => NewsCategory::Product,
            "partnership" => NewsCategory::Partnership,
            _ => NewsCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Funding => "funding",
            NewsCategory::Product => "product",
            NewsCategory::Partnership => "partnership",
            NewsCategory::Other => "other",
        }
    }
}

/// A news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: u64,
    pub headline: String,
    pub content: String,
    /// Raw category tag as published
    pub category: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    /// Human-readable estimate, e.g. `3 min read`
    pub read_time: String,
    pub company_id: Option<u64>,
}

impl NewsArticle {
    pub fn kind(&self) -> NewsCategory {
        NewsCategory::classify(&self.category)
    }
}

/// Estimate reading time for a body of text.
pub fn estimate_read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}

impl Record for NewsArticle {
    const KIND: RecordKind = RecordKind::News;

    const FIELDS: &'static [&'static str] = &[
        "id",
        "headline",
        "content",
        "category",
        "published_at",
        "source",
        "read_time",
        "company_id",
    ];

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.headline.as_str(),
            self.content.as_str(),
            self.category.as_str(),
        ]
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Int(self.id),
            "headline" => FieldValue::Text(&self.headline),
            "content" => FieldValue::Text(&self.content),
            "category" => FieldValue::Text(&self.category),
            // Seconds since the epoch, so articles rank by recency
            "published_at" => FieldValue::Int(self.published_at.timestamp().max(0) as u64),
            "source" => FieldValue::Text(&self.source),
            "read_time" => FieldValue::Text(&self.read_time),
            "company_id" => self.company_id.map_or(FieldValue::Missing, FieldValue::Int),
            _ => FieldValue::Missing,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_article(id: u64, headline: &str, company_id: Option<u64>, day: u32) -> NewsArticle {
    use chrono::TimeZone;

    NewsArticle {
        id,
        headline: headline.to_string(),
        content: "Body text".to_string(),
        category: "product".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 9, day, 10, 0, 0).unwrap(),
        source: "TechCrunch".to_string(),
        read_time: "1 min read".to_string(),
        company_id,
    }
}
