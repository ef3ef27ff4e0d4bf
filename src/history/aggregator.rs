//! The fetch → enrich → join → fold pipeline.
//!
//! One ledger call lists the contributions for an address; one concurrent
//! report lookup per contribution enriches them. Contributions whose lookup
//! fails or finds nothing are dropped from the join. The surviving entries
//! keep ledger order and are folded into summary statistics.

use crate::client::{ClientError, ContributionSource, ReportSource};
use crate::models::{HistoryEntry, ProfileHistory, SummaryStats};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

/// Options for the aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    /// Show a progress bar while report lookups are in flight.
    pub show_progress: bool,
}

/// Outcome of loading a contribution history.
///
/// Distinguishes an address with no recorded contributions from a ledger
/// that could not be queried; collapsing the two into one empty result
/// leaves consumers unable to tell data loss from absence.
#[derive(Debug)]
pub enum LoadOutcome {
    /// At least one contribution was joined with its report.
    Loaded(ProfileHistory),
    /// The ledger answered and there is nothing to show.
    Empty,
    /// The ledger could not be queried.
    Unavailable(ClientError),
}

/// Fetches and joins the contribution history for `address`.
///
/// Report lookups run concurrently, one per contribution; a failed or empty
/// lookup drops only its own contribution. Each lookup is bounded by the
/// HTTP client's request timeout. The returned history preserves the order
/// the ledger returned the contributions in.
pub async fn aggregate_history<L, R>(
    ledger: &L,
    reports: &R,
    address: &str,
    options: &AggregateOptions,
) -> Result<ProfileHistory, ClientError>
where
    L: ContributionSource,
    R: ReportSource,
{
    let contributions = ledger.contributions_by_address(address).await?;
    debug!(
        "Joining {} contributions for {}",
        contributions.len(),
        address
    );

    let progress = lookup_progress_bar(options, contributions.len());

    let lookups = contributions.iter().map(|contribution| {
        let progress = &progress;
        async move {
            let result = reports.report_by_id(&contribution.report_id).await;
            progress.inc(1);

            match result {
                Ok(Some(report)) => Some(HistoryEntry::from_join(contribution, &report)),
                Ok(None) => {
                    debug!(
                        "No report {} for contribution {}, dropping it",
                        contribution.report_id, contribution.txid
                    );
                    None
                }
                Err(e) => {
                    warn!(
                        "Report lookup {} failed, dropping contribution {}: {}",
                        contribution.report_id, contribution.txid, e
                    );
                    None
                }
            }
        }
    });

    // join_all preserves input order, so the history stays in ledger order.
    let history: Vec<HistoryEntry> = join_all(lookups).await.into_iter().flatten().collect();
    progress.finish_and_clear();

    let summary = SummaryStats::from_entries(&history);
    Ok(ProfileHistory { history, summary })
}

/// Fetches the history and tags the outcome.
pub async fn load_history<L, R>(
    ledger: &L,
    reports: &R,
    address: &str,
    options: &AggregateOptions,
) -> LoadOutcome
where
    L: ContributionSource,
    R: ReportSource,
{
    match aggregate_history(ledger, reports, address, options).await {
        Ok(profile) if profile.history.is_empty() => LoadOutcome::Empty,
        Ok(profile) => LoadOutcome::Loaded(profile),
        Err(e) => LoadOutcome::Unavailable(e),
    }
}

/// Fetches the history, degrading every failure to the empty result.
///
/// A ledger failure is logged and swallowed; the caller sees the same
/// zero-value history an address without contributions produces. Use
/// [`load_history`] when the difference matters.
#[allow(dead_code)] // Compatibility contract for embedding callers
pub async fn history_or_empty<L, R>(
    ledger: &L,
    reports: &R,
    address: &str,
    options: &AggregateOptions,
) -> ProfileHistory
where
    L: ContributionSource,
    R: ReportSource,
{
    match aggregate_history(ledger, reports, address, options).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Could not load history for {}: {}", address, e);
            ProfileHistory::default()
        }
    }
}

fn lookup_progress_bar(options: &AggregateOptions, lookups: usize) -> ProgressBar {
    if !options.show_progress || lookups == 0 {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(lookups as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}
