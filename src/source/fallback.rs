//! Embedded fallback datasets, one per skin

use super::payload::{CompanyPayload, NewsPayload, VcPayload};
use super::Skin;
use crate::{Error, Result};
use serde::Deserialize;

const BIOTECH: &str = include_str!("../../data/biotech.json");
const DIGITAL_NATIVES: &str = include_str!("../../data/digital_natives.json");

/// The three raw collections of an embedded dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub companies: Vec<CompanyPayload>,
    #[serde(default)]
    pub vcs: Vec<VcPayload>,
    #[serde(default)]
    pub news: Vec<NewsPayload>,
}

/// Decode the embedded dataset for `skin`
pub fn dataset(skin: Skin) -> Result<Dataset> {
    let raw = match skin {
        Skin::Biotech => BIOTECH,
        Skin::DigitalNatives => DIGITAL_NATIVES,
    };
    serde_json::from_str(raw).map_err(|e| Error::Dataset(format!("{} dataset: {}", skin, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_embedded_datasets_decode() {
        let biotech = dataset(Skin::Biotech).unwrap();
        assert_eq!(biotech.companies.len(), 10);
        assert_eq!(biotech.vcs.len(), 6);
        assert_eq!(biotech.news.len(), 10);

        let natives = dataset(Skin::DigitalNatives).unwrap();
        assert_eq!(natives.companies.len(), 12);
        assert_eq!(natives.vcs.len(), 6);
        assert_eq!(natives.news.len(), 10);
    }

    #[test]
    fn test_embedded_ids_are_unique() {
        for skin in [Skin::Biotech, Skin::DigitalNatives] {
            let data = dataset(skin).unwrap();
            let ids: HashSet<_> = data.companies.iter().filter_map(|c| c.id).collect();
            assert_eq!(ids.len(), data.companies.len(), "{} companies", skin);
            let ids: HashSet<_> = data.vcs.iter().filter_map(|v| v.id).collect();
            assert_eq!(ids.len(), data.vcs.len(), "{} vcs", skin);
            let ids: HashSet<_> = data.news.iter().filter_map(|n| n.id).collect();
            assert_eq!(ids.len(), data.news.len(), "{} news", skin);
        }
    }

    #[test]
    fn test_embedded_records_need_no_defaults() {
        let data = dataset(Skin::DigitalNatives).unwrap();
        for company in &data.companies {
            assert!(company.name.is_some());
            assert!(company.valuation.is_some());
            assert!(company.ncp_status.is_some());
        }
        for article in &data.news {
            assert!(article.published_at.is_some());
            assert!(article.read_time.is_some());
        }
    }
}
