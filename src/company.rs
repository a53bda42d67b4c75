//! Company records
//!
//! A company carries descriptive, financial and partner-program fields.
//! Partner tier and outreach flags are opaque: nothing in the data layer
//! attaches behavior to them beyond filtering and counting.

use crate::record::{FieldValue, Record, RecordKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Partnership status with the hardware vendor program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartnerStatus {
    #[serde(rename = "Partner")]
    Partner,
    #[default]
    #[serde(rename = "Not Partner")]
    NotPartner,
}

impl PartnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerStatus::Partner => "Partner",
            PartnerStatus::NotPartner => "Not Partner",
        }
    }

    pub fn is_partner(&self) -> bool {
        matches!(self, PartnerStatus::Partner)
    }
}

impl FromStr for PartnerStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "partner" => Ok(PartnerStatus::Partner),
            "not partner" | "non partner" | "none" => Ok(PartnerStatus::NotPartner),
            _ => Err(Error::InvalidValue(format!("Unknown partner status: {}", s))),
        }
    }
}

impl std::fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A portfolio company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Open industry category (e.g. `ai-natives`, `biotech`)
    pub industry: String,
    pub founded_year: u32,
    pub employees: u64,
    /// Headquarters location
    pub location: String,
    pub website: String,
    pub ceo: String,
    /// Total funding raised, in whole dollars
    pub funding_raised: u64,
    /// Latest valuation, in whole dollars
    pub valuation: u64,
    pub last_funding_round: String,
    pub investors: Vec<String>,
    /// Year-over-year growth, in percent
    pub growth_rate: f64,
    pub technical_employees_pct: f64,
    pub ncp_status: PartnerStatus,
    pub partner_tier: Option<String>,
    pub ai_native: bool,
    pub digital_native: bool,
    pub contacted: bool,
    pub last_contacted: Option<String>,
}

impl Company {
    /// Whether the company is enrolled in the partner program
    pub fn is_partner(&self) -> bool {
        self.ncp_status.is_partner()
    }

    /// Whether any listed investor matches `name` (case-insensitive)
    pub fn backed_by(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.investors.iter().any(|i| i.to_lowercase() == name)
    }
}

impl Record for Company {
    const KIND: RecordKind = RecordKind::Companies;

    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "industry",
        "founded_year",
        "employees",
        "location",
        "website",
        "ceo",
        "funding_raised",
        "valuation",
        "last_funding_round",
        "investors",
        "growth_rate",
        "technical_employees_pct",
        "ncp_status",
        "partner_tier",
        "ai_native",
        "digital_native",
        "contacted",
        "last_contacted",
    ];

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.industry.as_str(),
            self.location.as_str(),
        ]
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(&self.name),
            "description" => FieldValue::Text(&self.description),
            "industry" => FieldValue::Text(&self.industry),
            "founded_year" => FieldValue::Int(u64::from(self.founded_year)),
            "employees" => FieldValue::Int(self.employees),
            "location" => FieldValue::Text(&self.location),
            "website" => FieldValue::Text(&self.website),
            "ceo" => FieldValue::Text(&self.ceo),
            "funding_raised" => FieldValue::Int(self.funding_raised),
            "valuation" => FieldValue::Int(self.valuation),
            "last_funding_round" => FieldValue::Text(&self.last_funding_round),
            "investors" => FieldValue::List(&self.investors),
            "growth_rate" => FieldValue::Float(self.growth_rate),
            "technical_employees_pct" => FieldValue::Float(self.technical_employees_pct),
            "ncp_status" => FieldValue::Text(self.ncp_status.as_str()),
            "partner_tier" => self
                .partner_tier
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            "ai_native" => FieldValue::Bool(self.ai_native),
            "digital_native" => FieldValue::Bool(self.digital_native),
            "contacted" => FieldValue::Bool(self.contacted),
            "last_contacted" => self
                .last_contacted
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            _ => FieldValue::Missing,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_company(id: u64, name: &str, valuation: u64) -> Company {
    Company {
        id,
        name: name.to_string(),
        description: format!("{} builds things", name),
        industry: "digital-natives".to_string(),
        founded_year: 2015,
        employees: 100,
        location: "San Francisco, CA".to_string(),
        website: "#".to_string(),
        ceo: "Unknown".to_string(),
        funding_raised: valuation / 10,
        valuation,
        last_funding_round: "Seed".to_string(),
        investors: vec!["Accel".to_string()],
        growth_rate: 20.0,
        technical_employees_pct: 60.0,
        ncp_status: PartnerStatus::NotPartner,
        partner_tier: None,
        ai_native: false,
        digital_native: true,
        contacted: false,
        last_contacted: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_status_serde() {
        let json = serde_json::to_string(&PartnerStatus::NotPartner).unwrap();
        assert_eq!(json, "\"Not Partner\"");
        let parsed: PartnerStatus = serde_json::from_str("\"Partner\"").unwrap();
        assert_eq!(parsed, PartnerStatus::Partner);
    }

    #[test]
    fn test_partner_status_from_str() {
        assert_eq!("not-partner".parse::<PartnerStatus>().unwrap(), PartnerStatus::NotPartner);
        assert_eq!("PARTNER".parse::<PartnerStatus>().unwrap(), PartnerStatus::Partner);
        assert!("gold".parse::<PartnerStatus>().is_err());
    }

    #[test]
    fn test_field_access() {
        let mut company = sample_company(3, "Canva", 40_000_000_000);
        company.partner_tier = Some("Standard".to_string());

        assert_eq!(company.field("valuation"), FieldValue::Int(40_000_000_000));
        assert_eq!(company.field("name"), FieldValue::Text("Canva"));
        assert_eq!(company.field("partner_tier"), FieldValue::Text("Standard"));
        assert_eq!(company.field("last_contacted"), FieldValue::Missing);
        assert_eq!(company.field("no_such_field"), FieldValue::Missing);
        assert_eq!(company.field("ncp_status"), FieldValue::Text("Not Partner"));
    }

    #[test]
    fn test_every_declared_field_resolves() {
        let mut company = sample_company(1, "OpenAI", 1);
        company.partner_tier = Some("Premier".to_string());
        company.last_contacted = Some("2024-09-15".to_string());
        for name in Company::FIELDS {
            assert_ne!(company.field(name), FieldValue::Missing, "field {}", name);
        }
    }

    #[test]
    fn test_backed_by() {
        let company = sample_company(1, "Stripe", 1);
        assert!(company.backed_by("accel"));
        assert!(!company.backed_by("GV"));
    }
}
