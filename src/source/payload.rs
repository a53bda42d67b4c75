//! Source payloads and field-level defaulting
//!
//! Every payload field is optional. A field that is absent, null, or of the
//! wrong JSON type resolves to a fixed default, so a partial or malformed
//! record is repaired instead of rejected. Resolution happens once, when the
//! store is built.

use crate::article::{estimate_read_time, NewsArticle};
use crate::company::{Company, PartnerStatus};
use crate::investor::Vc;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Paginated list envelope used by the backend list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Accept any JSON value; keep it only if it decodes as `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Whole-dollar amounts and counts. Floats are rounded, numeric strings parsed,
/// negatives dropped.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// Percentages and scores. Numeric strings are accepted.
fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Parse the timestamp shapes seen in payloads: RFC 3339, naive date-time
/// (taken as UTC), or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn text_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Company as it arrives from the backend or the embedded dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyPayload {
    #[serde(default, deserialize_with = "lenient_count")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, alias = "industry_segment", deserialize_with = "lenient")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub founded_year: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub employees: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub website: Option<String>,
    #[serde(default, alias = "ceo_name", deserialize_with = "lenient")]
    pub ceo: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub funding_raised: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub valuation: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_funding_round: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub investors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub growth_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub technical_employees_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub ncp_status: Option<String>,
    #[serde(default, alias = "ncp_tier", deserialize_with = "lenient")]
    pub partner_tier: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub ai_native: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub digital_native: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub contacted: Option<bool>,
    #[serde(default, alias = "last_message", deserialize_with = "lenient")]
    pub last_contacted: Option<String>,
}

impl CompanyPayload {
    /// Resolve into a record. `fallback_id` is used when the payload carries
    /// no id.
    pub fn resolve(self, fallback_id: u64) -> Company {
        let founded_year = self
            .founded_year
            .and_then(|y| u32::try_from(y).ok())
            .or_else(|| {
                self.created_at
                    .as_deref()
                    .and_then(parse_timestamp)
                    .and_then(|ts| u32::try_from(ts.year()).ok())
            })
            .unwrap_or(0);

        Company {
            id: self.id.unwrap_or(fallback_id),
            name: text_or(self.name, "Unknown Company"),
            description: text_or(self.description, "No description available"),
            industry: text_or(self.industry, "unknown"),
            founded_year,
            employees: self.employees.unwrap_or(40),
            location: text_or(self.location, "United States"),
            website: text_or(self.website, "#"),
            ceo: text_or(self.ceo, "Unknown"),
            funding_raised: self.funding_raised.unwrap_or(20_000_000),
            valuation: self.valuation.unwrap_or(100_000_000),
            last_funding_round: text_or(self.last_funding_round, "Seed"),
            investors: self.investors.unwrap_or_else(|| {
                vec!["Sequoia Capital".to_string(), "Andreessen Horowitz".to_string()]
            }),
            growth_rate: self.growth_rate.unwrap_or(20.0),
            technical_employees_pct: self.technical_employees_pct.unwrap_or(60.0),
            ncp_status: self
                .ncp_status
                .and_then(|s| s.parse::<PartnerStatus>().ok())
                .unwrap_or_default(),
            partner_tier: self.partner_tier.filter(|t| !t.trim().is_empty()),
            ai_native: self.ai_native.unwrap_or(false),
            digital_native: self.digital_native.unwrap_or(false),
            contacted: self.contacted.unwrap_or(false),
            last_contacted: self.last_contacted.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// VC firm as it arrives from the backend or the embedded dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VcPayload {
    #[serde(default, deserialize_with = "lenient_count")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub investment_stage: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub website: Option<String>,
    #[serde(default, alias = "portfolio_size", deserialize_with = "lenient_count")]
    pub portfolio_companies: Option<u64>,
    #[serde(default, alias = "aum", deserialize_with = "lenient_count")]
    pub total_aum: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub investments: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub focus_areas: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub final_score: Option<f64>,
}

impl VcPayload {
    pub fn resolve(self, fallback_id: u64) -> Vc {
        Vc {
            id: self.id.unwrap_or(fallback_id),
            name: text_or(self.name, "Unknown Investor"),
            description: text_or(self.description, "No description available"),
            location: text_or(self.location, "United States"),
            investment_stage: text_or(self.investment_stage, "multi-stage"),
            website: text_or(self.website, "#"),
            portfolio_companies: self.portfolio_companies.unwrap_or(50),
            total_aum: self.total_aum.unwrap_or(500_000_000),
            investments: self.investments.unwrap_or(0),
            focus_areas: self.focus_areas.unwrap_or_else(|| {
                vec!["AI".to_string(), "SaaS".to_string(), "Fintech".to_string()]
            }),
            final_score: self.final_score.unwrap_or(0.0),
        }
    }
}

/// News article as it arrives from the backend or the embedded dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsPayload {
    #[serde(default, deserialize_with = "lenient_count")]
    pub id: Option<u64>,
    #[serde(default, alias = "title", deserialize_with = "lenient")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, alias = "published_date", deserialize_with = "lenient")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub read_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub company_id: Option<u64>,
}

impl NewsPayload {
    pub fn resolve(self, fallback_id: u64) -> NewsArticle {
        let content = text_or(self.content, "No content available");
        let read_time = self
            .read_time
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| estimate_read_time(&content));

        NewsArticle {
            id: self.id.unwrap_or(fallback_id),
            headline: text_or(self.headline, "Untitled"),
            category: text_or(self.category, "general"),
            published_at: self
                .published_at
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            source: text_or(self.source, "Unknown"),
            read_time,
            company_id: self.company_id,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_company_resolves_to_defaults() {
        let company = CompanyPayload::default().resolve(4);
        assert_eq!(company.id, 4);
        assert_eq!(company.name, "Unknown Company");
        assert_eq!(company.industry, "unknown");
        assert_eq!(company.employees, 40);
        assert_eq!(company.funding_raised, 20_000_000);
        assert_eq!(company.valuation, 100_000_000);
        assert_eq!(company.investors, vec!["Sequoia Capital", "Andreessen Horowitz"]);
        assert_eq!(company.ncp_status, PartnerStatus::NotPartner);
        assert_eq!(company.founded_year, 0);
        assert!(!company.ai_native);
    }

    #[test]
    fn test_defaulting_is_deterministic() {
        let raw = r#"{"id": 9, "name": "Partial"}"#;
        let a: CompanyPayload = serde_json::from_str(raw).unwrap();
        let b: CompanyPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(a.resolve(1), b.resolve(1));
    }

    #[test]
    fn test_backend_aliases() {
        let raw = r#"{
            "id": 3,
            "name": "Cohere",
            "industry_segment": "ai-natives",
            "ceo_name": "Aidan Gomez",
            "created_at": "2019-05-01T12:00:00",
            "last_message": "2024-09-15",
            "ncp_status": "Partner"
        }"#;
        let company = serde_json::from_str::<CompanyPayload>(raw).unwrap().resolve(1);
        assert_eq!(company.industry, "ai-natives");
        assert_eq!(company.ceo, "Aidan Gomez");
        assert_eq!(company.founded_year, 2019);
        assert_eq!(company.last_contacted.as_deref(), Some("2024-09-15"));
        assert!(company.is_partner());
    }

    #[test]
    fn test_malformed_fields_are_defaulted_not_rejected() {
        let raw = r#"{
            "id": "12",
            "name": null,
            "employees": "lots",
            "valuation": 2.5e9,
            "growth_rate": "33.5",
            "investors": "Accel",
            "ai_native": "yes"
        }"#;
        let company = serde_json::from_str::<CompanyPayload>(raw).unwrap().resolve(1);
        assert_eq!(company.id, 12);
        assert_eq!(company.name, "Unknown Company");
        assert_eq!(company.employees, 40);
        assert_eq!(company.valuation, 2_500_000_000);
        assert_eq!(company.growth_rate, 33.5);
        assert_eq!(company.investors.len(), 2);
        assert!(!company.ai_native);
    }

    #[test]
    fn test_present_zero_is_kept() {
        let raw = r#"{"id": 1, "funding_raised": 0, "employees": 0}"#;
        let company = serde_json::from_str::<CompanyPayload>(raw).unwrap().resolve(1);
        assert_eq!(company.funding_raised, 0);
        assert_eq!(company.employees, 0);
    }

    #[test]
    fn test_vc_aliases_and_defaults() {
        let raw = r#"{"id": 7, "name": "Accel", "aum": 4000000000, "portfolio_size": 150}"#;
        let vc = serde_json::from_str::<VcPayload>(raw).unwrap().resolve(1);
        assert_eq!(vc.total_aum, 4_000_000_000);
        assert_eq!(vc.portfolio_companies, 150);
        assert_eq!(vc.focus_areas, vec!["AI", "SaaS", "Fintech"]);
        assert_eq!(vc.final_score, 0.0);
    }

    #[test]
    fn test_news_defaults() {
        let raw = r#"{"title": "Notion ships AI", "published_date": "2024-08-28T12:30:00Z", "company_id": 10}"#;
        let article = serde_json::from_str::<NewsPayload>(raw).unwrap().resolve(2);
        assert_eq!(article.id, 2);
        assert_eq!(article.headline, "Notion ships AI");
        assert_eq!(article.category, "general");
        assert_eq!(article.read_time, "1 min read");
        assert_eq!(article.company_id, Some(10));
        assert_eq!(article.published_at, Utc.with_ymd_and_hms(2024, 8, 28, 12, 30, 0).unwrap());

        let undated = NewsPayload::default().resolve(1);
        assert_eq!(undated.published_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 9, 20, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-09-20T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-09-20T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-09-20T10:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-09-20"),
            Some(Utc.with_ymd_and_hms(2024, 9, 20, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("last tuesday"), None);
    }

    #[test]
    fn test_envelope_without_results() {
        let envelope: Envelope<CompanyPayload> = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(envelope.results.is_empty());
    }
}
