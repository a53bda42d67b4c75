//! Venture capital firm records

use crate::record::{FieldValue, Record, RecordKind};
use serde::{Deserialize, Serialize};

/// An investor firm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vc {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub location: String,
    /// Stage label such as `multi-stage` or `early-stage`
    pub investment_stage: String,
    pub website: String,
    pub portfolio_companies: u64,
    /// Assets under management, in whole dollars
    pub total_aum: u64,
    pub investments: u64,
    pub focus_areas: Vec<String>,
    /// Ranking score computed upstream
    pub final_score: f64,
}

impl Vc {
    /// Whether any focus area contains `query` (case-insensitive)
    pub fn focuses_on(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.focus_areas
            .iter()
            .any(|area| area.to_lowercase().contains(&query))
    }
}

impl Record for Vc {
    const KIND: RecordKind = RecordKind::Vcs;

    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "location",
        "investment_stage",
        "website",
        "portfolio_companies",
        "total_aum",
        "investments",
        "focus_areas",
        "final_score",
    ];

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.location.as_str(),
        ]
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(&self.name),
            "description" => FieldValue::Text(&self.description),
            "location" => FieldValue::Text(&self.location),
            "investment_stage" => FieldValue::Text(&self.investment_stage),
            "website" => FieldValue::Text(&self.website),
            "portfolio_companies" => FieldValue::Int(self.portfolio_companies),
            "total_aum" => FieldValue::Int(self.total_aum),
            "investments" => FieldValue::Int(self.investments),
            "focus_areas" => FieldValue::List(&self.focus_areas),
            "final_score" => FieldValue::Float(self.final_score),
            _ => FieldValue::Missing,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_vc(id: u64, name: &str, final_score: f64) -> Vc {
    Vc {
        id,
        name: name.to_string(),
        description: format!("{} invests early", name),
        location: "Menlo Park, CA".to_string(),
        investment_stage: "multi-stage".to_string(),
        website: "#".to_string(),
        portfolio_companies: 100,
        total_aum: 1_000_000_000,
        investments: 10,
        focus_areas: vec!["AI".to_string(), "Fintech".to_string()],
        final_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focuses_on() {
        let vc = sample_vc(101, "Sequoia Capital", 95.8);
        assert!(vc.focuses_on("fin"));
        assert!(vc.focuses_on("ai"));
        assert!(!vc.focuses_on("healthcare"));
    }

    #[test]
    fn test_search_fields_exclude_focus_areas() {
        let vc = sample_vc(101, "Sequoia Capital", 95.8);
        let fields = vc.search_fields();
        assert_eq!(fields, vec!["Sequoia Capital", "Sequoia Capital invests early", "Menlo Park, CA"]);
    }

    #[test]
    fn test_field_access() {
        let vc = sample_vc(102, "Accel", 88.7);
        assert_eq!(vc.field("final_score"), FieldValue::Float(88.7));
        assert_eq!(vc.field("total_aum"), FieldValue::Int(1_000_000_000));
        assert_eq!(vc.field("aum"), FieldValue::Missing);
    }
}
