//! Aggregate statistics
//!
//! Every summary is computed in a single pass and is all zeros for an empty
//! collection. Monetary totals are `u128` so sums over `u64` amounts cannot
//! overflow; they serialize saturated to `u64`, the widest integer JSON
//! consumers accept.

use crate::article::{NewsArticle, NewsCategory};
use crate::company::Company;
use crate::investor::Vc;
use crate::record::Record;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

/// Round to two decimals, halves up (towards positive infinity).
///
/// The scaled value is snapped to six decimals first, so a decimal input
/// such as `1.005` rounds up even though its binary form lies just below.
pub fn round2(value: f64) -> f64 {
    let scaled = (value * 100.0 * 1e6).round() / 1e6;
    (scaled + 0.5).floor() / 100.0
}

/// Clamp a monetary total into `u64`
pub fn saturating_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn serialize_saturating<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(saturating_u64(*value))
}

fn average(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { round2(sum / count as f64) }
}

/// A record kind that knows how to summarize a collection of itself.
pub trait Summarize: Record + Sized {
    type Summary: Default + Serialize;

    fn summarize(records: &[Self]) -> Self::Summary;
}

/// Summary of `records`, zero-valued when empty
pub fn aggregate_stats<T: Summarize>(records: &[T]) -> T::Summary {
    T::summarize(records)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub count: usize,
    #[serde(serialize_with = "serialize_saturating")]
    pub total_funding: u128,
    #[serde(serialize_with = "serialize_saturating")]
    pub total_valuation: u128,
    pub total_employees: u64,
    /// Mean growth rate, two decimals
    pub avg_growth_rate: f64,
    pub partners: usize,
    pub ai_natives: usize,
    pub digital_natives: usize,
    pub contacted: usize,
    /// Number of distinct industries
    pub industries: usize,
}

impl Summarize for Company {
    type Summary = CompanySummary;

    fn summarize(records: &[Self]) -> CompanySummary {
        let mut summary = CompanySummary::default();
        let mut growth = 0.0;
        let mut industries = HashSet::new();

        for c in records {
            summary.count += 1;
            summary.total_funding += u128::from(c.funding_raised);
            summary.total_valuation += u128::from(c.valuation);
            summary.total_employees = summary.total_employees.saturating_add(c.employees);
            growth += c.growth_rate;
            summary.partners += usize::from(c.is_partner());
            summary.ai_natives += usize::from(c.ai_native);
            summary.digital_natives += usize::from(c.digital_native);
            summary.contacted += usize::from(c.contacted);
            industries.insert(c.industry.as_str());
        }

        summary.avg_growth_rate = average(growth, summary.count);
        summary.industries = industries.len();
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcSummary {
    pub count: usize,
    #[serde(serialize_with = "serialize_saturating")]
    pub total_aum: u128,
    pub total_portfolio_companies: u64,
    pub total_investments: u64,
    /// Mean final score, two decimals
    pub avg_score: f64,
}

impl Summarize for Vc {
    type Summary = VcSummary;

    fn summarize(records: &[Self]) -> VcSummary {
        let mut summary = VcSummary::default();
        let mut score = 0.0;

        for v in records {
            summary.count += 1;
            summary.total_aum += u128::from(v.total_aum);
            summary.total_portfolio_companies = summary
                .total_portfolio_companies
                .saturating_add(v.portfolio_companies);
            summary.total_investments = summary.total_investments.saturating_add(v.investments);
            score += v.final_score;
        }

        summary.avg_score = average(score, summary.count);
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSummary {
    pub count: usize,
    pub funding: usize,
    pub product: usize,
    pub partnership: usize,
    pub other: usize,
    /// Distinct company references across all articles
    pub companies_covered: usize,
}

impl Summarize for NewsArticle {
    type Summary = NewsSummary;

    fn summarize(records: &[Self]) -> NewsSummary {
        let mut summary = NewsSummary::default();
        let mut covered = HashSet::new();

        for n in records {
            summary.count += 1;
            match n.kind() {
                NewsCategory::Funding => summary.funding += 1,
                NewsCategory::Product => summary.product += 1,
                NewsCategory::Partnership => summary.partnership += 1,
                NewsCategory::Other => summary.other += 1,
            }
            if let Some(id) = n.company_id {
                covered.insert(id);
            }
        }

        summary.companies_covered = covered.len();
        summary
    }
}

/// Partner program headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerStats {
    pub total_companies: usize,
    pub partner_companies: usize,
    pub ai_natives: usize,
    /// Share of partners, in percent with two decimals
    pub partner_percentage: f64,
}

pub fn partner_stats(companies: &[Company]) -> PartnerStats {
    let total = companies.len();
    let partners = companies.iter().filter(|c| c.is_partner()).count();
    let ai_natives = companies.iter().filter(|c| c.ai_native).count();
    let partner_percentage = if total == 0 {
        0.0
    } else {
        round2(partners as f64 / total as f64 * 100.0)
    };

    PartnerStats {
        total_companies: total,
        partner_companies: partners,
        ai_natives,
        partner_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::sample_article;
    use crate::company::{sample_company, PartnerStatus};
    use crate::investor::sample_vc;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(20.0), 20.0);
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn test_empty_collections_are_zero() {
        assert_eq!(aggregate_stats::<Company>(&[]), CompanySummary::default());
        assert_eq!(aggregate_stats::<Vc>(&[]), VcSummary::default());
        assert_eq!(aggregate_stats::<NewsArticle>(&[]), NewsSummary::default());
        assert_eq!(partner_stats(&[]), PartnerStats::default());
    }

    #[test]
    fn test_company_summary() {
        let mut a = sample_company(1, "OpenAI", 29_000_000_000);
        a.industry = "ai-natives".to_string();
        a.ai_native = true;
        a.digital_native = false;
        a.ncp_status = PartnerStatus::Partner;
        a.contacted = true;
        a.growth_rate = 15.0;
        let b = sample_company(2, "Uber", 75_000_000_000);
        let c = sample_company(3, "Airbnb", 75_000_000_000);

        let summary = aggregate_stats(&[a, b, c]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_valuation, 179_000_000_000);
        assert_eq!(summary.total_funding, 17_900_000_000);
        assert_eq!(summary.total_employees, 300);
        assert_eq!(summary.avg_growth_rate, 18.33);
        assert_eq!(summary.partners, 1);
        assert_eq!(summary.ai_natives, 1);
        assert_eq!(summary.digital_natives, 2);
        assert_eq!(summary.contacted, 1);
        assert_eq!(summary.industries, 2);
    }

    #[test]
    fn test_monetary_totals_do_not_overflow() {
        let companies = vec![
            sample_company(1, "A", u64::MAX),
            sample_company(2, "B", u64::MAX),
        ];
        let summary = aggregate_stats(&companies);
        assert_eq!(summary.total_valuation, u128::from(u64::MAX) * 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_valuation"], u64::MAX);
        assert_eq!(saturating_u64(summary.total_valuation), u64::MAX);
    }

    #[test]
    fn test_vc_summary() {
        let summary = aggregate_stats(&[sample_vc(1, "Sequoia", 95.8), sample_vc(2, "Accel", 88.7)]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_aum, 2_000_000_000);
        assert_eq!(summary.total_portfolio_companies, 200);
        assert_eq!(summary.total_investments, 20);
        assert_eq!(summary.avg_score, 92.25);
    }

    #[test]
    fn test_news_summary() {
        let mut funding = sample_article(1, "Raise", Some(1), 1);
        funding.category = "Funding".to_string();
        let mut growth = sample_article(2, "Growth", Some(1), 2);
        growth.category = "growth".to_string();
        let product = sample_article(3, "Launch", None, 3);

        let summary = aggregate_stats(&[funding, growth, product]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.funding, 1);
        assert_eq!(summary.product, 1);
        assert_eq!(summary.partnership, 0);
        assert_eq!(summary.other, 1);
        assert_eq!(summary.companies_covered, 1);
    }

    #[test]
    fn test_partner_stats() {
        let mut companies: Vec<_> = (1..=3).map(|i| sample_company(i, "Co", 1)).collect();
        companies[0].ncp_status = PartnerStatus::Partner;
        companies[1].ncp_status = PartnerStatus::Partner;
        companies[2].ai_native = true;

        let stats = partner_stats(&companies);
        assert_eq!(stats.total_companies, 3);
        assert_eq!(stats.partner_companies, 2);
        assert_eq!(stats.ai_natives, 1);
        assert_eq!(stats.partner_percentage, 66.67);
    }
}
