//! Runtime configuration
//!
//! Every value here defaults to the constants the notifier ships with. The binary
//! always runs with `Config::default()`; the serde derives let tests build
//! alternate configurations from TOML snippets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::TickInterval;

/// Top-level configuration threaded through every component
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub thresholds: Thresholds,
    /// Seconds between poll cycles
    pub poll_interval_secs: u64,
    /// Directory holding one `{base}-{currency}.png` logo per market
    pub logo_dir: PathBuf,
    pub chart: ChartConfig,
    pub notification: NotificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange: ExchangeConfig::default(),
            thresholds: Thresholds::default(),
            poll_interval_secs: 60,
            logo_dir: std::env::temp_dir().join("bittrex_logos"),
            chart: ChartConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Exchange endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Public v1.1 API root (summaries, markets)
    pub api_url: String,
    /// v2.0 API root (tick history)
    pub ticks_url: String,
    /// Market page, the symbol is appended
    pub market_url: String,
    /// Display name used as the notification subtitle
    pub name: String,
    pub timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://bittrex.com/api/v1.1".to_string(),
            ticks_url: "https://bittrex.com/Api/v2.0".to_string(),
            market_url: "https://bittrex.com/Market/Index?MarketName=".to_string(),
            name: "Bittrex".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Pump/dump detection thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Only markets quoted in this currency are scanned
    pub base_currency: String,
    /// Minimum base volume, exclusive
    pub min_volume: Decimal,
    /// `last / low` must exceed this to count as a pump
    pub pump_ratio: Decimal,
    /// `last / high` must fall below this to count as a dump
    pub dump_ratio: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            base_currency: "BTC".to_string(),
            min_volume: dec!(200),
            pump_ratio: dec!(1.75),
            dump_ratio: dec!(0.75),
        }
    }
}

/// Price chart attached to each notification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub interval: TickInterval,
    /// Samples plotted (48 x 30min = 24h)
    pub samples: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            interval: TickInterval::ThirtyMin,
            samples: 48,
            width: 800,
            height: 400,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub sound: String,
    /// Executable used to post notifications
    pub program: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            sound: "Basso".to_string(),
            program: "terminal-notifier".to_string(),
        }
    }
}
