//! Bittrex public API client
//!
//! Summaries and market reference data come from the v1.1 public API, tick
//! history from the v2.0 `pub/market` endpoint.

use super::{ExchangeApi, TickInterval};
use crate::config::ExchangeConfig;
use crate::error::{Error, Result};
use crate::types::{Market, MarketSummary, Tick};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Bittrex API client
#[derive(Clone)]
pub struct BittrexClient {
    http: Client,
    api_url: String,
    ticks_url: String,
}

/// Every Bittrex response is wrapped in this envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BittrexSummary {
    market_name: String,
    high: Option<Decimal>,
    low: Option<Decimal>,
    last: Option<Decimal>,
    base_volume: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BittrexMarket {
    market_name: String,
    market_currency: String,
    base_currency: String,
    logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BittrexTick {
    #[serde(rename = "C")]
    close: Decimal,
    #[serde(rename = "T")]
    timestamp: NaiveDateTime,
}

impl From<BittrexSummary> for MarketSummary {
    fn from(s: BittrexSummary) -> Self {
        Self {
            symbol: s.market_name,
            last: s.last.unwrap_or(Decimal::ZERO),
            low: s.low.unwrap_or(Decimal::ZERO),
            high: s.high.unwrap_or(Decimal::ZERO),
            base_volume: s.base_volume.unwrap_or(Decimal::ZERO),
        }
    }
}

impl From<BittrexMarket> for Market {
    fn from(m: BittrexMarket) -> Self {
        Self {
            symbol: m.market_name,
            base_currency: m.base_currency,
            market_currency: m.market_currency,
            logo_url: m.logo_url.filter(|url| !url.is_empty()),
        }
    }
}

impl From<BittrexTick> for Tick {
    fn from(t: BittrexTick) -> Self {
        Self {
            timestamp: t.timestamp.and_utc(),
            close: t.close,
        }
    }
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.result)
        } else {
            Err(Error::Api(
                self.message.unwrap_or_else(|| "request unsuccessful".to_string()),
            ))
        }
    }
}

impl BittrexClient {
    /// Create a new Bittrex client
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            ticks_url: config.ticks_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        debug!("GET {}", url);
        let envelope: Envelope<Vec<T>> = self
            .http
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.into_result()?.unwrap_or_default())
    }
}

#[async_trait]
impl ExchangeApi for BittrexClient {
    async fn get_market_summaries(&self) -> Result<Vec<MarketSummary>> {
        let url = format!("{}/public/getmarketsummaries", self.api_url);
        let summaries: Vec<BittrexSummary> = self.get_list(&url, &[]).await?;
        Ok(summaries.into_iter().map(MarketSummary::from).collect())
    }

    async fn get_markets(&self) -> Result<Vec<Market>> {
        let url = format!("{}/public/getmarkets", self.api_url);
        let markets: Vec<BittrexMarket> = self.get_list(&url, &[]).await?;
        Ok(markets.into_iter().map(Market::from).collect())
    }

    async fn get_ticks(&self, symbol: &str, interval: TickInterval) -> Result<Vec<Tick>> {
        let url = format!("{}/pub/market/GetTicks", self.ticks_url);
        let ticks: Vec<BittrexTick> = self
            .get_list(
                &url,
                &[("marketName", symbol), ("tickInterval", interval.as_str())],
            )
            .await?;

        let mut ticks: Vec<Tick> = ticks.into_iter().map(Tick::from).collect();
        ticks.sort_by_key(|t| t.timestamp);
        Ok(ticks)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_envelope() {
        let body = r#"{
            "success": true,
            "message": "",
            "result": [{
                "MarketName": "BTC-ETH",
                "High": 0.0135,
                "Low": 0.012,
                "Volume": 1500.5,
                "Last": 0.0131,
                "BaseVolume": 19.62,
                "TimeStamp": "2017-06-01T10:00:00.123"
            }]
        }"#;
        let envelope: Envelope<Vec<BittrexSummary>> = serde_json::from_str(body).unwrap();
        let summaries: Vec<MarketSummary> = envelope
            .into_result()
            .unwrap()
            .unwrap()
            .into_iter()
            .map(MarketSummary::from)
            .collect();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].symbol, "BTC-ETH");
        assert_eq!(summaries[0].last, dec!(0.0131));
        assert_eq!(summaries[0].low, dec!(0.012));
        assert_eq!(summaries[0].base_volume, dec!(19.62));
    }

    #[test]
    fn test_summary_null_prices_default_to_zero() {
        let body = r#"{"MarketName": "BTC-NEW", "High": null, "Low": null, "Last": null, "BaseVolume": null}"#;
        let summary: MarketSummary = serde_json::from_str::<BittrexSummary>(body).unwrap().into();
        assert_eq!(summary.low, Decimal::ZERO);
        assert_eq!(summary.low_ratio(), None);
    }

    #[test]
    fn test_unsuccessful_envelope_is_api_error() {
        let body = r#"{"success": false, "message": "INVALID_MARKET", "result": null}"#;
        let envelope: Envelope<Vec<BittrexTick>> = serde_json::from_str(body).unwrap();
        match envelope.into_result() {
            Err(Error::Api(msg)) => assert_eq!(msg, "INVALID_MARKET"),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_null_result_is_empty() {
        let body = r#"{"success": true, "message": "", "result": null}"#;
        let envelope: Envelope<Vec<BittrexTick>> = serde_json::from_str(body).unwrap();
        assert!(envelope.into_result().unwrap().is_none());
    }

    #[test]
    fn test_market_logo_url() {
        let body = r#"{
            "MarketCurrency": "LTC",
            "BaseCurrency": "BTC",
            "MarketName": "BTC-LTC",
            "IsActive": true,
            "LogoUrl": "https://bittrexblobstorage.blob.core.windows.net/public/6defbc41.png"
        }"#;
        let market: Market = serde_json::from_str::<BittrexMarket>(body).unwrap().into();
        assert_eq!(market.symbol, "BTC-LTC");
        assert_eq!(market.logo_file_name(), "BTC-LTC.png");
        assert!(market.logo_url.is_some());

        let body = r#"{"MarketCurrency": "X", "BaseCurrency": "BTC", "MarketName": "BTC-X", "LogoUrl": ""}"#;
        let market: Market = serde_json::from_str::<BittrexMarket>(body).unwrap().into();
        assert!(market.logo_url.is_none());
    }

    #[test]
    fn test_tick_parsing() {
        let body = r#"{"O": 0.012, "H": 0.013, "L": 0.011, "C": 0.0125, "V": 100.0, "T": "2017-06-01T00:30:00", "BV": 1.25}"#;
        let tick: Tick = serde_json::from_str::<BittrexTick>(body).unwrap().into();
        assert_eq!(tick.close, dec!(0.0125));
        assert_eq!(tick.timestamp.to_rfc3339(), "2017-06-01T00:30:00+00:00");
    }

    #[test]
    fn test_tick_interval_names() {
        assert_eq!(TickInterval::ThirtyMin.as_str(), "thirtyMin");
        assert_eq!(TickInterval::OneMin.as_str(), "oneMin");
        assert_eq!(TickInterval::Day.as_str(), "day");
    }

    #[test]
    fn test_client_trims_urls() {
        let config = ExchangeConfig {
            api_url: "https://example.com/api/".to_string(),
            ticks_url: "https://example.com/v2/".to_string(),
            ..ExchangeConfig::default()
        };
        let client = BittrexClient::new(&config).unwrap();
        assert_eq!(client.api_url, "https://example.com/api");
        assert_eq!(client.ticks_url, "https://example.com/v2");
    }
}
