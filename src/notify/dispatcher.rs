//! Concurrent per-market notification delivery

use super::{build_notification, NotificationSink};
use crate::chart::ChartRenderer;
use crate::config::{Config, ExchangeConfig};
use crate::logos;
use crate::types::MarketSummary;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What happened to one market's notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Delivered { with_chart: bool },
    Failed { with_chart: bool },
    Cancelled,
}

/// Tally of one dispatch round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Notifications sent (or tried) without a chart image
    pub without_chart: usize,
    pub cancelled: usize,
}

impl DispatchReport {
    fn record(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Delivered { with_chart } => {
                self.delivered += 1;
                if !with_chart {
                    self.without_chart += 1;
                }
            }
            Delivery::Failed { with_chart } => {
                self.failed += 1;
                if !with_chart {
                    self.without_chart += 1;
                }
            }
            Delivery::Cancelled => self.cancelled += 1,
        }
    }

    /// True when anything short of full delivery with charts happened
    pub fn is_degraded(&self) -> bool {
        self.failed > 0 || self.without_chart > 0 || self.cancelled > 0
    }
}

/// Sends one notification per flagged market, all in parallel
#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    charts: Arc<ChartRenderer>,
    logo_dir: PathBuf,
    exchange: ExchangeConfig,
    sound: String,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>, charts: Arc<ChartRenderer>, config: &Config) -> Self {
        Self {
            sink,
            charts,
            logo_dir: config.logo_dir.clone(),
            exchange: config.exchange.clone(),
            sound: config.notification.sound.clone(),
        }
    }

    /// Notify every market and wait for all of them.
    ///
    /// Each market runs in its own task. A failing delivery does not affect
    /// the others. Cancelling `cancel` makes pending tasks give up at their
    /// next suspension point; they are still awaited before this returns.
    /// Dropping the returned future aborts every task still in flight.
    pub async fn dispatch(&self, markets: Vec<MarketSummary>, cancel: &CancellationToken) -> DispatchReport {
        let mut report = DispatchReport {
            attempted: markets.len(),
            ..DispatchReport::default()
        };
        if markets.is_empty() {
            return report;
        }

        let mut tasks = JoinSet::new();
        for market in markets {
            let this = self.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move { this.notify(market, cancel).await });
        }

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(delivery) => report.record(delivery),
                Err(e) => {
                    error!("Notification task failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Dispatched {} notifications: {} delivered, {} failed, {} cancelled",
            report.attempted, report.delivered, report.failed, report.cancelled
        );
        report
    }

    async fn notify(self, market: MarketSummary, cancel: CancellationToken) -> Delivery {
        let chart = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Delivery::Cancelled,
            outcome = self.charts.render(&market.symbol) => outcome.into_image(),
        };
        let with_chart = chart.is_some();

        let icon = logos::icon_path(&self.logo_dir, &market.symbol).await;
        let notification = build_notification(
            &market,
            &self.exchange,
            &self.sound,
            icon,
            chart.as_ref().map(|c| c.path().to_path_buf()),
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Delivery::Cancelled,
            result = self.sink.deliver(&notification) => result,
        };
        // Chart file goes away here whatever the outcome
        drop(chart);

        match result {
            Ok(()) => {
                debug!("Notified {}", market.symbol);
                Delivery::Delivered { with_chart }
            }
            Err(e) => {
                warn!("Failed to notify {}: {}", market.symbol, e);
                Delivery::Failed { with_chart }
            }
        }
    }
}
