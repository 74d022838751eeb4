//! Quote providers: dolarapi.com for fiat rates, criptoya.com for USDT/ARS
//!
//! Thin HTTP layer. Every fetch goes through the injected TTL cache so a
//! refresh cycle inside the cache window reuses the previous responses
//! instead of hammering the providers.

pub mod cache;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::config::{
    CRIPTOYA_BASE_URL, CRIPTOYA_PROBE_AMOUNT, DOLARAPI_MEP_URL, DOLARAPI_OFICIAL_URL,
    HTTP_TIMEOUT_SECS,
};
use cache::QuoteCache;

/// A fiat dollar quote as published by dolarapi.
///
/// `compra` is the broker's buy price (the user sells at it); `venta` is the
/// broker's sell price (the user buys at it).
#[derive(Debug, Clone, Deserialize)]
pub struct FxRate {
    pub compra: f64,
    pub venta: f64,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

/// A USDT/ARS quote from one criptoya venue.
///
/// `total_bid` is the all-in price at which the user can sell USDT there.
#[derive(Debug, Clone, Deserialize)]
pub struct UsdtQuote {
    pub ask: f64,
    #[serde(rename = "totalAsk")]
    pub total_ask: f64,
    pub bid: f64,
    #[serde(rename = "totalBid")]
    pub total_bid: f64,
    pub time: u64,
}

pub struct QuoteClient {
    client: Client,
    cache: Arc<QuoteCache>,
}

impl QuoteClient {
    pub fn new(cache: Arc<QuoteCache>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, cache })
    }

    /// Official dollar rate
    pub async fn official_rate(&self) -> Result<FxRate> {
        self.fetch_json(DOLARAPI_OFICIAL_URL).await
    }

    /// MEP (stock-exchange) dollar rate
    pub async fn mep_rate(&self) -> Result<FxRate> {
        self.fetch_json(DOLARAPI_MEP_URL).await
    }

    /// USDT/ARS quote for one exchange
    pub async fn usdt_ars(&self, exchange: &str) -> Result<UsdtQuote> {
        let url = format!(
            "{}/{}/USDT/ARS/{}",
            CRIPTOYA_BASE_URL, exchange, CRIPTOYA_PROBE_AMOUNT
        );
        self.fetch_json(&url).await
    }

    /// GET `url`, going through the cache. The raw JSON body is cached so a
    /// hit skips both the request and the status handling.
    async fn fetch_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        if let Some(body) = self.cache.get(url) {
            tracing::debug!(url, "quote cache hit");
            return Ok(serde_json::from_value(body)?);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(eyre!("{url} returned {status}: {body}"));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| eyre!("failed to parse response from {url}: {e}. Body: {body}"))?;
        let parsed: T = serde_json::from_value(value.clone())
            .map_err(|e| eyre!("unexpected response shape from {url}: {e}. Body: {body}"))?;

        self.cache.put(url.to_string(), value);
        Ok(parsed)
    }
}
