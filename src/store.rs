//! Record store
//!
//! Holds the three collections for the lifetime of a session. The store is
//! built once, either from a live [`RecordSource`] or from the embedded
//! dataset of a [`Skin`], and is read-only afterwards.
//!
//! Live data is all-or-nothing: if any of the three collections fails to
//! load, all three come from the fallback dataset.

use crate::article::NewsArticle;
use crate::company::Company;
use crate::investor::Vc;
use crate::record::{Record, RecordKind};
use crate::source::{fallback, CompanyPayload, NewsPayload, RecordSource, Skin, VcPayload};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Where the store's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOrigin {
    Live,
    Fallback,
}

impl LoadOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadOrigin::Live => "live",
            LoadOrigin::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ready store plus the origin of its data.
#[derive(Debug, Clone)]
pub struct LoadedStore {
    pub store: RecordStore,
    pub origin: LoadOrigin,
}

/// In-memory holder of companies, VCs and news articles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    companies: Vec<Company>,
    vcs: Vec<Vc>,
    news: Vec<NewsArticle>,
}

impl RecordStore {
    /// Build a store from already-resolved records.
    ///
    /// Records sharing an id with an earlier record are dropped.
    pub fn new(companies: Vec<Company>, vcs: Vec<Vc>, news: Vec<NewsArticle>) -> Self {
        Self {
            companies: dedupe_by_id(companies),
            vcs: dedupe_by_id(vcs),
            news: dedupe_by_id(news),
        }
    }

    /// Resolve raw payloads (field-level defaulting) and build a store.
    ///
    /// Payloads without an id get their 1-based position when no other
    /// record claims it, otherwise the next id above every id in use.
    pub fn from_payloads(
        companies: Vec<CompanyPayload>,
        vcs: Vec<VcPayload>,
        news: Vec<NewsPayload>,
    ) -> Self {
        let company_ids = assign_ids(companies.iter().map(|p| p.id));
        let vc_ids = assign_ids(vcs.iter().map(|p| p.id));
        let news_ids = assign_ids(news.iter().map(|p| p.id));

        Self::new(
            companies
                .into_iter()
                .zip(company_ids)
                .map(|(p, id)| p.resolve(id))
                .collect(),
            vcs.into_iter().zip(vc_ids).map(|(p, id)| p.resolve(id)).collect(),
            news.into_iter().zip(news_ids).map(|(p, id)| p.resolve(id)).collect(),
        )
    }

    /// Build the store from the embedded dataset of `skin`
    pub fn fallback(skin: Skin) -> Result<Self> {
        let data = fallback::dataset(skin)?;
        Ok(Self::from_payloads(data.companies, data.vcs, data.news))
    }

    /// Load all three collections from `source`, falling back to the
    /// embedded dataset of `skin` if any of them fails.
    ///
    /// The three fetches run concurrently and independently. The returned
    /// future resolves exactly once, when the store is ready. Only a broken
    /// embedded dataset produces an error.
    pub async fn load<S>(source: &S, skin: Skin) -> Result<LoadedStore>
    where
        S: RecordSource + ?Sized,
    {
        tracing::info!(source = %source.describe(), "Loading records");

        let (companies, vcs, news) = tokio::join!(
            source.fetch_companies(),
            source.fetch_vcs(),
            source.fetch_news(),
        );

        match (companies, vcs, news) {
            (Ok(companies), Ok(vcs), Ok(news)) => {
                let store = Self::from_payloads(companies, vcs, news);
                tracing::info!(
                    companies = store.companies.len(),
                    vcs = store.vcs.len(),
                    news = store.news.len(),
                    "Loaded live records"
                );
                Ok(LoadedStore {
                    store,
                    origin: LoadOrigin::Live,
                })
            }
            (companies, vcs, news) => {
                let failures = [
                    (RecordKind::Companies, companies.err()),
                    (RecordKind::Vcs, vcs.err()),
                    (RecordKind::News, news.err()),
                ];
                for (kind, err) in failures {
                    if let Some(e) = err {
                        tracing::warn!(%kind, error = %e, "Collection load failed");
                    }
                }

                tracing::info!(%skin, "Backend not available, using fallback dataset");
                Ok(LoadedStore {
                    store: Self::fallback(skin)?,
                    origin: LoadOrigin::Fallback,
                })
            }
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn vcs(&self) -> &[Vc] {
        &self.vcs
    }

    pub fn news(&self) -> &[NewsArticle] {
        &self.news
    }

    /// Number of records in one collection
    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Companies => self.companies.len(),
            RecordKind::Vcs => self.vcs.len(),
            RecordKind::News => self.news.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty() && self.vcs.is_empty() && self.news.is_empty()
    }
}

/// Final id of every payload, explicit ids untouched
fn assign_ids(explicit: impl Iterator<Item = Option<u64>>) -> Vec<u64> {
    let explicit: Vec<Option<u64>> = explicit.collect();
    let mut taken: HashSet<u64> = explicit.iter().flatten().copied().collect();
    let mut next = taken.iter().max().copied().unwrap_or(0);

    explicit
        .iter()
        .enumerate()
        .map(|(i, id)| match id {
            Some(id) => *id,
            None => {
                let position = i as u64 + 1;
                if taken.insert(position) {
                    return position;
                }
                loop {
                    next += 1;
                    if taken.insert(next) {
                        break next;
                    }
                }
            }
        })
        .collect()
}

fn dedupe_by_id<T: Record>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let before = records.len();
    let kept: Vec<T> = records.into_iter().filter(|r| seen.insert(r.id())).collect();
    if kept.len() < before {
        let kind = T::KIND;
        tracing::warn!(%kind, dropped = before - kept.len(), "Dropped records with duplicate ids");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};
    use async_trait::async_trait;

    /// Source with scripted per-collection outcomes
    struct ScriptedSource {
        companies: bool,
        vcs: bool,
        news: bool,
    }

    fn failure() -> Error {
        Error::Api {
            status: 500,
            url: "scripted".to_string(),
        }
    }

    #[async_trait]
    impl RecordSource for ScriptedSource {
        async fn fetch_companies(&self) -> Result<Vec<CompanyPayload>> {
            if !self.companies {
                return Err(failure());
            }
            Ok(vec![serde_json::from_str(r#"{"id": 77, "name": "LiveCo"}"#)?])
        }

        async fn fetch_vcs(&self) -> Result<Vec<VcPayload>> {
            if !self.vcs {
                return Err(failure());
            }
            Ok(vec![serde_json::from_str(r#"{"id": 5, "name": "Live Ventures"}"#)?])
        }

        async fn fetch_news(&self) -> Result<Vec<NewsPayload>> {
            if !self.news {
                return Err(failure());
            }
            Ok(Vec::new())
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    #[tokio::test]
    async fn test_live_load() {
        let source = ScriptedSource { companies: true, vcs: true, news: true };
        let loaded = RecordStore::load(&source, Skin::Biotech).await.unwrap();

        assert_eq!(loaded.origin, LoadOrigin::Live);
        assert_eq!(loaded.store.companies().len(), 1);
        assert_eq!(loaded.store.companies()[0].name, "LiveCo");
        assert!(loaded.store.news().is_empty());
    }

    #[tokio::test]
    async fn test_single_failure_falls_back_for_everything() {
        let source = ScriptedSource { companies: true, vcs: false, news: true };
        let loaded = RecordStore::load(&source, Skin::DigitalNatives).await.unwrap();

        assert_eq!(loaded.origin, LoadOrigin::Fallback);
        assert_eq!(loaded.store, RecordStore::fallback(Skin::DigitalNatives).unwrap());
        assert!(loaded.store.companies().iter().all(|c| c.name != "LiveCo"));
    }

    #[tokio::test]
    async fn test_total_failure_falls_back() {
        let source = ScriptedSource { companies: false, vcs: false, news: false };
        let loaded = RecordStore::load(&source, Skin::Biotech).await.unwrap();

        assert_eq!(loaded.origin, LoadOrigin::Fallback);
        assert_eq!(loaded.store.count(RecordKind::Companies), 10);
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back() {
        // Reserve a port, then release it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = crate::source::HttpSource::new(format!("http://{}", addr));
        let loaded = RecordStore::load(&source, Skin::DigitalNatives).await.unwrap();
        assert_eq!(loaded.origin, LoadOrigin::Fallback);
        assert_eq!(loaded.store.count(RecordKind::Companies), 12);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let store = RecordStore::from_payloads(
            vec![
                serde_json::from_str(r#"{"id": 1, "name": "First"}"#).unwrap(),
                serde_json::from_str(r#"{"id": 1, "name": "Second"}"#).unwrap(),
                serde_json::from_str(r#"{"id": 2, "name": "Third"}"#).unwrap(),
            ],
            Vec::new(),
            Vec::new(),
        );
        let names: Vec<_> = store.companies().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third"]);
    }

    #[test]
    fn test_missing_ids_use_position() {
        let store = RecordStore::from_payloads(
            Vec::new(),
            Vec::new(),
            vec![NewsPayload::default(), NewsPayload::default()],
        );
        let ids: Vec<_> = store.news().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_missing_id_never_takes_an_explicit_one() {
        let store = RecordStore::from_payloads(
            vec![
                serde_json::from_str(r#"{"id": 2, "name": "Explicit"}"#).unwrap(),
                serde_json::from_str(r#"{"name": "Unnumbered"}"#).unwrap(),
            ],
            Vec::new(),
            Vec::new(),
        );
        let names: Vec<_> = store.companies().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Explicit", "Unnumbered"]);
        assert_eq!(store.companies()[1].id, 3);
    }

    #[test]
    fn test_assign_ids() {
        assert_eq!(assign_ids([None, None].into_iter()), vec![1, 2]);
        assert_eq!(assign_ids([Some(2), None].into_iter()), vec![2, 3]);
        // Later explicit ids are reserved too
        assert_eq!(assign_ids([None, Some(1), None, Some(4)].into_iter()), vec![5, 1, 3, 4]);
        assert_eq!(assign_ids([Some(7), Some(7), None].into_iter()), vec![7, 7, 3]);
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::default();
        assert!(store.is_empty());
        for kind in RecordKind::all() {
            assert_eq!(store.count(*kind), 0);
        }
    }
}
