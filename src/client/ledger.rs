//! Ledger service client.
//!
//! The ledger is a Directus-style collection API: contributions live in an
//! `items/contributions` collection filtered by sender address, wrapped in a
//! `{ "data": [...] }` envelope.

use crate::client::{ClientError, ContributionSource};
use crate::models::ContributionRecord;
use serde::Deserialize;
use tracing::debug;

/// Envelope the collection API wraps list responses in.
#[derive(Debug, Deserialize)]
struct ContributionList {
    data: Vec<ContributionRecord>,
}

/// Client for the ledger/index service.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    base_url: String,
}

impl LedgerClient {
    /// Creates a client against the given base URL.
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the contributions collection filtered by sender address.
    fn contributions_url(&self, address: &str) -> String {
        format!(
            "{}/items/contributions?filter[sender_address][_eq]={}",
            self.base_url, address
        )
    }
}

impl ContributionSource for LedgerClient {
    async fn contributions_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<ContributionRecord>, ClientError> {
        let url = self.contributions_url(address);
        debug!("Fetching contributions: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }

        let list: ContributionList = response
            .json()
            .await
            .map_err(|e| ClientError::Decode { url, source: e })?;

        debug!("Ledger returned {} contributions", list.data.len());
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributions_url() {
        let client = LedgerClient::new(reqwest::Client::new(), "http://ledger.test");
        assert_eq!(
            client.contributions_url("0xabc"),
            "http://ledger.test/items/contributions?filter[sender_address][_eq]=0xabc"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = LedgerClient::new(reqwest::Client::new(), "http://ledger.test/");
        assert!(client
            .contributions_url("0xabc")
            .starts_with("http://ledger.test/items/"));
    }

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{
            "data": [
                {
                    "txid": "0x1",
                    "report_id": "a",
                    "date_created": "2024-03-21T16:00:00.000Z",
                    "amount": 10.0
                },
                {
                    "txid": "0x2",
                    "report_id": "b",
                    "date_created": "2024-03-22T09:30:00.000Z",
                    "amount": 5.0
                }
            ]
        }"#;

        let list: ContributionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].txid, "0x1");
        assert_eq!(list.data[1].report_id, "b");
    }
}
