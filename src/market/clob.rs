//! CLOB API client for market listing and price history
//!
//! Walks `/markets` one cursor page at a time and reads full-range price
//! histories from `/prices-history`.

use super::{ApiError, ListingPage, MarketListing, PriceHistorySource, PricePoint};
use super::types::PricesHistoryResponse;
use crate::config::{ApiConfig, CollectConfig};
use crate::telemetry::{record_latency, LatencyMetric};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// CLOB API base URL
pub const CLOB_API_URL: &str = "https://clob.polymarket.com";

/// Configuration for the CLOB client
#[derive(Debug, Clone)]
pub struct ClobConfig {
    /// Base URL for the CLOB API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Sampling granularity for price history
    pub fidelity: String,
}

impl Default for ClobConfig {
    fn default() -> Self {
        Self {
            base_url: CLOB_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            fidelity: "1".to_string(),
        }
    }
}

impl ClobConfig {
    pub fn from_config(api: &ApiConfig, collect: &CollectConfig) -> Self {
        Self {
            base_url: api.clob_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(api.timeout_secs),
            fidelity: collect.fidelity.clone(),
        }
    }
}

/// Client for Polymarket's CLOB REST API
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ClobClient {
    config: ClobConfig,
    client: Client,
}

impl ClobClient {
    /// Create a new CLOB client with default configuration
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClobConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClobConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClobConfig {
        &self.config
    }

    fn markets_url(&self) -> String {
        format!("{}/markets", self.config.base_url)
    }

    fn prices_history_url(&self) -> String {
        format!("{}/prices-history", self.config.base_url)
    }
}

#[async_trait]
impl MarketListing for ClobClient {
    async fn fetch_page(&self, cursor: &str) -> Result<ListingPage, ApiError> {
        let url = self.markets_url();
        tracing::debug!(url = %url, cursor, "Fetching market listing page");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[("next_cursor", cursor)])
            .send()
            .await?;
        let body: serde_json::Value = decode(response).await?;
        record_latency(LatencyMetric::ListingPage, started.elapsed());

        Ok(ListingPage::from_json(body))
    }
}

#[async_trait]
impl PriceHistorySource for ClobClient {
    async fn fetch_history(&self, token_id: &str) -> Result<Vec<PricePoint>, ApiError> {
        let url = self.prices_history_url();
        tracing::debug!(url = %url, token_id, fidelity = %self.config.fidelity, "Fetching price history");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("market", token_id),
                ("interval", "max"),
                ("fidelity", self.config.fidelity.as_str()),
            ])
            .send()
            .await?;
        let data: PricesHistoryResponse = decode(response).await?;
        record_latency(LatencyMetric::PriceHistory, started.elapsed());

        Ok(data.history)
    }
}

/// Check the status and decode the JSON body
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
