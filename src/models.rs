//! Data models for the contribution history reporter.
//!
//! This module contains the core data structures: the wire records fetched
//! from the ledger and report services, the joined history entries, and the
//! derived summary statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recorded transfer of value, as returned by the ledger service.
///
/// Produced externally and never mutated; identified by `txid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRecord {
    /// Transaction id on the ledger.
    pub txid: String,
    /// Id of the report this contribution funded.
    pub report_id: String,
    /// When the contribution was recorded.
    pub date_created: DateTime<Utc>,
    /// Contributed amount in currency units.
    pub amount: f64,
}

/// Descriptive metadata for a funded report, as returned by the report service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Report headline.
    pub title: String,
    /// Impact category (e.g. "Education", "Health").
    pub category: String,
    /// Region the report covers. The report service calls this `state`.
    #[serde(rename = "state")]
    pub region: String,
    /// Short summary of the report.
    pub summary: String,
    /// URL of the report's cover image.
    pub image: String,
}

/// An image reference with alt text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// One contribution joined with its report metadata.
///
/// Built per invocation from a `ContributionRecord` and the matching
/// `ReportRecord`; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Transaction id of the underlying contribution.
    pub id: String,
    /// When the contribution was recorded.
    pub date: DateTime<Utc>,
    /// Contributed amount in currency units.
    pub amount: f64,
    /// Cover image of the funded report.
    pub image: ImageRef,
    /// Report headline.
    pub title: String,
    /// Impact category of the funded report.
    pub category: String,
    /// Region the funded report covers.
    pub location: String,
    /// Short summary of the funded report.
    pub description: String,
}

impl HistoryEntry {
    /// Joins one contribution with its report metadata.
    pub fn from_join(contribution: &ContributionRecord, report: &ReportRecord) -> Self {
        Self {
            id: contribution.txid.clone(),
            date: contribution.date_created,
            amount: contribution.amount,
            image: ImageRef {
                src: report.image.clone(),
                alt: report.title.clone(),
            },
            title: report.title.clone(),
            category: report.category.clone(),
            location: report.region.clone(),
            description: report.summary.clone(),
        }
    }
}

/// Summary statistics over a set of history entries.
///
/// `report_count` equals the number of joined entries, `total_amount` the sum
/// of their amounts, and `category_counts` partitions `report_count` exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Sum of amounts over all joined entries.
    pub total_amount: f64,
    /// Number of entries per category. Keys are case-sensitive, taken
    /// verbatim from the report service.
    pub category_counts: HashMap<String, usize>,
    /// Number of joined entries.
    pub report_count: usize,
}

impl SummaryStats {
    /// Creates summary statistics from a list of history entries.
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let mut stats = Self::default();
        stats.report_count = entries.len();

        for entry in entries {
            stats.total_amount += entry.amount;
            *stats
                .category_counts
                .entry(entry.category.clone())
                .or_insert(0) += 1;
        }

        stats
    }

    /// Returns categories sorted by count, highest first.
    pub fn top_categories(&self) -> Vec<(&str, usize)> {
        let mut categories: Vec<(&str, usize)> = self
            .category_counts
            .iter()
            .map(|(category, count)| (category.as_str(), *count))
            .collect();

        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        categories
    }
}

/// The aggregate the history routine produces: joined entries in ledger
/// order plus their summary statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileHistory {
    /// Joined entries, in the order the ledger service returned them.
    pub history: Vec<HistoryEntry>,
    /// Summary statistics over `history`.
    pub summary: SummaryStats,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Address the history was fetched for.
    pub address: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Base URL of the ledger service.
    pub ledger_url: String,
    /// Base URL of the report service.
    pub report_url: String,
    /// Number of history entries in the report.
    pub entry_count: usize,
    /// How long fetching and aggregation took.
    pub duration_seconds: f64,
}

/// The complete contribution history report.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Summary statistics.
    pub summary: SummaryStats,
    /// Joined history entries.
    pub history: Vec<HistoryEntry>,
}
