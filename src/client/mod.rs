//! HTTP clients for the two external services.
//!
//! The ledger service lists contributions by address; the report service
//! resolves a report id to its metadata. Both clients share one
//! `reqwest::Client` so the request timeout is configured in a single place.

pub mod ledger;
pub mod reports;

pub use ledger::LedgerClient;
pub use reports::ReportClient;

use crate::models::{ContributionRecord, ReportRecord};
use thiserror::Error;

/// Errors returned by the service clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The service could not be reached.
    #[error("cannot connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body could not be deserialized.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Classifies a transport-level `reqwest` error for the given URL.
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ClientError::Timeout {
                url: url.to_string(),
            }
        } else if source.is_connect() {
            ClientError::Connect {
                url: url.to_string(),
                source,
            }
        } else {
            ClientError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Source of contribution records for an address.
///
/// Implemented by [`LedgerClient`] and by in-memory fakes in tests.
pub trait ContributionSource {
    /// Lists all contributions recorded for `address`, in ledger order.
    async fn contributions_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<ContributionRecord>, ClientError>;
}

/// Source of report metadata by id.
///
/// Implemented by [`ReportClient`] and by in-memory fakes in tests.
pub trait ReportSource {
    /// Resolves a report id to its metadata. `Ok(None)` means the report
    /// does not exist; errors are transport or service failures.
    async fn report_by_id(&self, report_id: &str) -> Result<Option<ReportRecord>, ClientError>;
}
