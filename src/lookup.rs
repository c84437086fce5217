//! Transaction detail lookup against the BlockCypher REST API.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Extended details for a single transaction.
///
/// `hash` and `total` are always served; the rest depends on what the API
/// knows about the transaction, so everything else is optional.
#[derive(Clone, Debug, Deserialize)]
pub struct TransactionDetails {
    pub hash: String,
    /// Total amount transferred, in satoshis.
    pub total: u64,
    pub fees: Option<u64>,
    pub size: Option<u64>,
    pub confirmations: Option<u64>,
    pub received: Option<DateTime<Utc>>,
    pub double_spend: Option<bool>,
    #[serde(rename = "vin_sz")]
    pub input_count: Option<u64>,
    #[serde(rename = "vout_sz")]
    pub output_count: Option<u64>,
}

impl TransactionDetails {
    /// Transferred amount scaled from satoshis to BTC.
    pub fn amount_btc(&self) -> f64 {
        self.total as f64 * 1e-8
    }

    /// Fee scaled from satoshis to BTC, when known.
    pub fn fee_btc(&self) -> Option<f64> {
        self.fees.map(|f| f as f64 * 1e-8)
    }
}

/// Client for the transaction lookup API.
#[derive(Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    api_base: String,
}

impl LookupClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client - TLS backend unavailable");
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    fn transaction_url(&self, hash: &str) -> String {
        format!("{}/txs/{}", self.api_base.trim_end_matches('/'), hash)
    }

    /// Fetch extended details for a transaction by hash.
    pub async fn transaction(&self, hash: &str) -> Result<TransactionDetails> {
        let url = self.transaction_url(hash);
        tracing::debug!(%url, "Fetching transaction details");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .context("Lookup API returned an error status")?;

        let details: TransactionDetails = response
            .json()
            .await
            .context("Failed to decode transaction details")?;
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_url() {
        let client = LookupClient::new("https://api.blockcypher.com/v1/btc/main");
        assert_eq!(
            client.transaction_url("abc123"),
            "https://api.blockcypher.com/v1/btc/main/txs/abc123"
        );

        let client = LookupClient::new("https://api.blockcypher.com/v1/btc/main/");
        assert_eq!(
            client.transaction_url("abc123"),
            "https://api.blockcypher.com/v1/btc/main/txs/abc123"
        );
    }

    #[test]
    fn test_deserialize_minimal_response() {
        let details: TransactionDetails =
            serde_json::from_str(r#"{"hash":"abc123","total":150000}"#).unwrap();
        assert_eq!(details.hash, "abc123");
        assert_eq!(details.total, 150000);
        assert!(details.fees.is_none());
        assert!(details.received.is_none());
    }

    #[test]
    fn test_deserialize_full_response() {
        let body = r#"{
            "hash": "f854aebae95150b379cc1187d848d58225f3c4157fe992bcd166f58bd5063449",
            "total": 70320221545,
            "fees": 0,
            "size": 636,
            "confirmations": 63066,
            "received": "2014-03-29T01:29:19Z",
            "double_spend": false,
            "vin_sz": 4,
            "vout_sz": 1,
            "block_height": 293000
        }"#;
        let details: TransactionDetails = serde_json::from_str(body).unwrap();
        assert_eq!(details.total, 70320221545);
        assert_eq!(details.fees, Some(0));
        assert_eq!(details.input_count, Some(4));
        assert_eq!(details.output_count, Some(1));
        assert!(details.received.is_some());
        assert_eq!(details.double_spend, Some(false));
    }

    #[test]
    fn test_amount_btc_scaling() {
        let details: TransactionDetails =
            serde_json::from_str(r#"{"hash":"abc123","total":150000}"#).unwrap();
        assert_eq!(details.amount_btc().to_string(), "0.0015");

        let details: TransactionDetails =
            serde_json::from_str(r#"{"hash":"x","total":100000000}"#).unwrap();
        assert_eq!(details.amount_btc(), 1.0);
    }
}
