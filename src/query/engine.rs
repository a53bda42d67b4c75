//! Query engine implementation
//!
//! Provides the dashboard-facing query surface over a [`RecordStore`]:
//! - Lookups, filters, search and top-N for each collection
//! - Kind-dispatched variants used by the CLI and the HTTP API
//! - Cross-collection helpers (news for a company, investors of a company)
//! - Dashboard and partner-program statistics

use super::ops;
use super::stats::{self, CompanySummary, NewsSummary, PartnerStats, VcSummary};
use crate::article::NewsArticle;
use crate::company::Company;
use crate::investor::Vc;
use crate::record::{FieldValue, Record, RecordKind};
use crate::store::RecordStore;
use serde::Serialize;

/// A borrowed record of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordRef<'a> {
    Company(&'a Company),
    Vc(&'a Vc),
    News(&'a NewsArticle),
}

impl<'a> RecordRef<'a> {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordRef::Company(_) => RecordKind::Companies,
            RecordRef::Vc(_) => RecordKind::Vcs,
            RecordRef::News(_) => RecordKind::News,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            RecordRef::Company(c) => c.id,
            RecordRef::Vc(v) => v.id,
            RecordRef::News(n) => n.id,
        }
    }

    /// Display title: name for companies and VCs, headline for news
    pub fn title(&self) -> &'a str {
        match *self {
            RecordRef::Company(c) => &c.name,
            RecordRef::Vc(v) => &v.name,
            RecordRef::News(n) => &n.headline,
        }
    }

    pub fn field(&self, name: &str) -> FieldValue<'a> {
        match *self {
            RecordRef::Company(c) => c.field(name),
            RecordRef::Vc(v) => v.field(name),
            RecordRef::News(n) => n.field(name),
        }
    }
}

/// Results of one query run against all three collections.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults<'a> {
    pub companies: Vec<&'a Company>,
    pub vcs: Vec<&'a Vc>,
    pub news: Vec<&'a NewsArticle>,
}

impl SearchResults<'_> {
    pub fn total(&self) -> usize {
        self.companies.len() + self.vcs.len() + self.news.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Statistics for every collection at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub companies: CompanySummary,
    pub vcs: VcSummary,
    pub news: NewsSummary,
    pub partners: PartnerStats,
}

/// Query engine over a loaded record store
pub struct QueryEngine<'a> {
    store: &'a RecordStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn company(&self, id: u64) -> Option<&'a Company> {
        ops::get_by_id(self.store.companies(), id)
    }

    pub fn vc(&self, id: u64) -> Option<&'a Vc> {
        ops::get_by_id(self.store.vcs(), id)
    }

    pub fn article(&self, id: u64) -> Option<&'a NewsArticle> {
        ops::get_by_id(self.store.news(), id)
    }

    pub fn search_companies(&self, query: &str) -> Vec<&'a Company> {
        ops::search(self.store.companies(), query)
    }

    pub fn search_vcs(&self, query: &str) -> Vec<&'a Vc> {
        ops::search(self.store.vcs(), query)
    }

    pub fn search_news(&self, query: &str) -> Vec<&'a NewsArticle> {
        ops::search(self.store.news(), query)
    }

    /// Run `query` against all three collections
    pub fn search_all(&self, query: &str) -> SearchResults<'a> {
        SearchResults {
            companies: self.search_companies(query),
            vcs: self.search_vcs(query),
            news: self.search_news(query),
        }
    }

    /// VCs with a focus area containing `query` (case-insensitive)
    pub fn search_investors_by_focus(&self, query: &str) -> Vec<&'a Vc> {
        self.store.vcs().iter().filter(|v| v.focuses_on(query)).collect()
    }

    pub fn top_companies(&self, field: &str, n: usize) -> Vec<&'a Company> {
        ops::top_n_by_field(self.store.companies(), field, n)
    }

    pub fn top_vcs(&self, field: &str, n: usize) -> Vec<&'a Vc> {
        ops::top_n_by_field(self.store.vcs(), field, n)
    }

    pub fn companies_by_industry(&self, industry: &str) -> Vec<&'a Company> {
        ops::filter_by_field(self.store.companies(), "industry", industry)
    }

    /// Articles referencing `company_id`, in collection order
    pub fn news_for_company(&self, company_id: u64) -> Vec<&'a NewsArticle> {
        self.store
            .news()
            .iter()
            .filter(|n| n.company_id == Some(company_id))
            .collect()
    }

    /// The `limit` most recently published articles, newest first
    pub fn recent_news(&self, limit: usize) -> Vec<&'a NewsArticle> {
        let mut news: Vec<&NewsArticle> = self.store.news().iter().collect();
        news.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        news.truncate(limit);
        news
    }

    /// VCs listed among the company's investors, matched by name
    pub fn investors_of(&self, company: &Company) -> Vec<&'a Vc> {
        self.store
            .vcs()
            .iter()
            .filter(|v| company.backed_by(&v.name))
            .collect()
    }

    /// Companies listing the VC among their investors
    pub fn portfolio_of(&self, vc: &Vc) -> Vec<&'a Company> {
        self.store
            .companies()
            .iter()
            .filter(|c| c.backed_by(&vc.name))
            .collect()
    }

    pub fn get(&self, kind: RecordKind, id: u64) -> Option<RecordRef<'a>> {
        match kind {
            RecordKind::Companies => self.company(id).map(RecordRef::Company),
            RecordKind::Vcs => self.vc(id).map(RecordRef::Vc),
            RecordKind::News => self.article(id).map(RecordRef::News),
        }
    }

    pub fn filter(&self, kind: RecordKind, field: &str, value: &str) -> Vec<RecordRef<'a>> {
        match kind {
            RecordKind::Companies => wrap(ops::filter_by_field(self.store.companies(), field, value), RecordRef::Company),
            RecordKind::Vcs => wrap(ops::filter_by_field(self.store.vcs(), field, value), RecordRef::Vc),
            RecordKind::News => wrap(ops::filter_by_field(self.store.news(), field, value), RecordRef::News),
        }
    }

    pub fn search(&self, kind: RecordKind, query: &str) -> Vec<RecordRef<'a>> {
        match kind {
            RecordKind::Companies => wrap(self.search_companies(query), RecordRef::Company),
            RecordKind::Vcs => wrap(self.search_vcs(query), RecordRef::Vc),
            RecordKind::News => wrap(self.search_news(query), RecordRef::News),
        }
    }

    pub fn top(&self, kind: RecordKind, field: &str, n: usize) -> Vec<RecordRef<'a>> {
        match kind {
            RecordKind::Companies => wrap(self.top_companies(field, n), RecordRef::Company),
            RecordKind::Vcs => wrap(self.top_vcs(field, n), RecordRef::Vc),
            RecordKind::News => wrap(ops::top_n_by_field(self.store.news(), field, n), RecordRef::News),
        }
    }

    /// Whether `field` names a field of records of `kind`
    pub fn knows_field(kind: RecordKind, field: &str) -> bool {
        let fields = match kind {
            RecordKind::Companies => Company::FIELDS,
            RecordKind::Vcs => Vc::FIELDS,
            RecordKind::News => NewsArticle::FIELDS,
        };
        fields.contains(&field)
    }

    pub fn partner_stats(&self) -> PartnerStats {
        stats::partner_stats(self.store.companies())
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            companies: stats::aggregate_stats(self.store.companies()),
            vcs: stats::aggregate_stats(self.store.vcs()),
            news: stats::aggregate_stats(self.store.news()),
            partners: self.partner_stats(),
        }
    }
}

fn wrap<'a, T>(records: Vec<&'a T>, f: fn(&'a T) -> RecordRef<'a>) -> Vec<RecordRef<'a>> {
    records.into_iter().map(f).collect()
}
