//! Bittrex Pump & Dump Notifier
//!
//! Polls Bittrex market summaries and raises a desktop notification, with a
//! 24h price chart attached, for every BTC market that pumps or dumps.
//!
//! ## Architecture
//!
//! ```text
//! PollingLoop ─► ExchangeApi ─► MarketFilter ─► NotificationDispatcher ─► NotificationSink
//!                                                  │        │
//!                                            ChartRenderer  LogoCache
//! ```

pub mod chart;
pub mod client;
pub mod config;
pub mod error;
pub mod logos;
pub mod monitor;
pub mod notify;
pub mod scanner;
pub mod service;
pub mod types;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod config_tests;
