//! Report service client.
//!
//! Resolves a report id to its metadata via `GET /api/reports/{id}`. A 404
//! means the report does not exist and maps to `Ok(None)`; every other
//! non-success status is an error.

use crate::client::{ClientError, ReportSource};
use crate::models::ReportRecord;
use reqwest::StatusCode;
use tracing::debug;

/// Client for the report metadata service.
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReportClient {
    /// Creates a client against the given base URL.
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn report_url(&self, report_id: &str) -> String {
        format!("{}/api/reports/{}", self.base_url, report_id)
    }
}

impl ReportSource for ReportClient {
    async fn report_by_id(&self, report_id: &str) -> Result<Option<ReportRecord>, ClientError> {
        let url = self.report_url(report_id);
        debug!("Fetching report: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Report {} not found", report_id);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }

        let report: ReportRecord = response
            .json()
            .await
            .map_err(|e| ClientError::Decode { url, source: e })?;

        Ok(Some(report))
    }
}
