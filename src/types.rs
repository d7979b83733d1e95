//! Core types shared across the notifier

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// 24h summary of one market, fetched fresh every poll cycle
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    /// Market name, e.g. `BTC-ETH`
    pub symbol: String,
    pub last: Decimal,
    pub low: Decimal,
    pub high: Decimal,
    /// Volume denominated in the base currency
    pub base_volume: Decimal,
}

impl MarketSummary {
    /// `last / low`, `None` when the low is zero
    pub fn low_ratio(&self) -> Option<Decimal> {
        self.last.checked_div(self.low)
    }

    /// `last / high`, `None` when the high is zero
    pub fn high_ratio(&self) -> Option<Decimal> {
        self.last.checked_div(self.high)
    }

    /// Percent move from the period low
    pub fn low_change_pct(&self) -> Decimal {
        percent_change(self.last, self.low)
    }

    /// Percent move from the period high (negative when below it)
    pub fn high_change_pct(&self) -> Decimal {
        percent_change(self.last, self.high)
    }
}

fn percent_change(value: Decimal, reference: Decimal) -> Decimal {
    (value - reference)
        .checked_div(reference)
        .map(|r| r * Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// Market reference data, used to populate the logo cache
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub symbol: String,
    pub base_currency: String,
    pub market_currency: String,
    pub logo_url: Option<String>,
}

impl Market {
    /// File name of this market's logo inside the cache directory
    pub fn logo_file_name(&self) -> String {
        format!("{}-{}.png", self.base_currency, self.market_currency)
    }
}

/// One candle of price history
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
}

/// Desktop notification for a flagged market
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    pub group: String,
    pub sound: String,
    pub link: String,
    pub app_icon: Option<PathBuf>,
    pub content_image: Option<PathBuf>,
}
