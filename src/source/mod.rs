//! Record sources
//!
//! A source produces raw payloads for the three collections:
//! - [`HttpSource`]: the backend list endpoints (`/companies`, `/vcs`, `/news`)
//! - [`fallback`]: the embedded dataset for each dashboard skin

pub mod fallback;
pub mod http;
pub mod payload;

pub use fallback::Dataset;
pub use http::HttpSource;
pub use payload::{CompanyPayload, Envelope, NewsPayload, VcPayload};

use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Dashboard product skin. Selects which embedded dataset backs the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Skin {
    /// Biotech and healthcare startups
    Biotech,
    /// Digital and AI natives in the partner program
    #[default]
    DigitalNatives,
}

impl Skin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Biotech => "biotech",
            Skin::DigitalNatives => "digital-natives",
        }
    }
}

impl FromStr for Skin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "biotech" | "healthcare" => Ok(Skin::Biotech),
            "digital-natives" | "digital" | "nvidia" | "partner" => Ok(Skin::DigitalNatives),
            _ => Err(Error::InvalidValue(format!("Unknown skin: {}", s))),
        }
    }
}

impl std::fmt::Display for Skin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Anything that can hand over the three raw collections.
///
/// Each fetch is independent: one failing says nothing about the others.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_companies(&self) -> Result<Vec<CompanyPayload>>;

    async fn fetch_vcs(&self) -> Result<Vec<VcPayload>>;

    async fn fetch_news(&self) -> Result<Vec<NewsPayload>>;

    /// Short label for logs
    fn describe(&self) -> String;
}
