//! Exchange API clients
//!
//! The rest of the crate only talks to [`ExchangeApi`], so tests can swap the
//! HTTP client for a mock.

mod bittrex;

pub use bittrex::BittrexClient;

use crate::error::Result;
use crate::types::{Market, MarketSummary, Tick};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Candle granularity for tick history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickInterval {
    OneMin,
    FiveMin,
    ThirtyMin,
    Hour,
    Day,
}

impl TickInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickInterval::OneMin => "oneMin",
            TickInterval::FiveMin => "fiveMin",
            TickInterval::ThirtyMin => "thirtyMin",
            TickInterval::Hour => "hour",
            TickInterval::Day => "day",
        }
    }
}

/// Read-only market data source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// 24h summaries for every market
    async fn get_market_summaries(&self) -> Result<Vec<MarketSummary>>;

    /// Reference data for every market
    async fn get_markets(&self) -> Result<Vec<Market>>;

    /// Price history for one market, oldest first
    async fn get_ticks(&self, symbol: &str, interval: TickInterval) -> Result<Vec<Tick>>;

    /// Raw bytes behind a URL (logos)
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}
