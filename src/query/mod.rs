//! Query layer: search, filter, rank and aggregate over the record store

pub mod engine;
pub mod ops;
pub mod stats;

pub use engine::{DashboardStats, QueryEngine, RecordRef, SearchResults};
pub use ops::{filter_by_field, get_by_id, search, top_n_by_field};
pub use stats::{aggregate_stats, partner_stats, CompanySummary, NewsSummary, PartnerStats, Summarize, VcSummary};
