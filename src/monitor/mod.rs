//! Polling loop
//!
//! Runs one fetch → scan → dispatch cycle immediately, then one per timer tick,
//! until the shutdown token is cancelled. A failed summary fetch is fatal.


use crate::client::ExchangeApi;
use crate::error::Result;
use crate::notify::{DispatchReport, NotificationDispatcher};
use crate::scanner::MarketFilter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Outcome of one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub scanned: usize,
    pub pumps: usize,
    pub dumps: usize,
    pub dispatch: DispatchReport,
}

pub struct PollingLoop {
    exchange: Arc<dyn ExchangeApi>,
    filter: MarketFilter,
    dispatcher: NotificationDispatcher,
    interval: Duration,
}

impl PollingLoop {
    pub fn new(
        exchange: Arc<dyn ExchangeApi>,
        filter: MarketFilter,
        dispatcher: NotificationDispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            exchange,
            filter,
            dispatcher,
            interval,
        }
    }

    /// Fetch summaries, flag pumps and dumps, notify, and wait for delivery
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Result<CycleReport> {
        let summaries = self.exchange.get_market_summaries().await.map_err(|e| {
            error!("Failed to fetch market summaries: {}", e);
            e
        })?;

        let candidates = self.filter.scan(&summaries);
        let mut report = CycleReport {
            scanned: summaries.len(),
            pumps: candidates.pumps.len(),
            dumps: candidates.dumps.len(),
            ..CycleReport::default()
        };

        if candidates.is_empty() {
            debug!("Scanned {} markets, nothing flagged", report.scanned);
            return Ok(report);
        }

        info!(
            "Scanned {} markets: {} pumps, {} dumps",
            report.scanned, report.pumps, report.dumps
        );
        report.dispatch = self
            .dispatcher
            .dispatch(candidates.into_flagged(), cancel)
            .await;
        Ok(report)
    }

    /// Poll until `shutdown` is cancelled. Returns the number of cycles run.
    ///
    /// Cancellation stops new cycles from starting; a cycle already running
    /// passes the token to its tasks and is drained before this returns. A
    /// fetch that fails after cancellation ends the loop cleanly.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<u64> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = 0;

        info!("Polling every {}s", self.interval.as_secs());
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let report = match self.run_cycle(&shutdown).await {
                Ok(report) => report,
                Err(e) if shutdown.is_cancelled() => {
                    warn!("Cycle interrupted by shutdown: {}", e);
                    break;
                }
                Err(e) => return Err(e),
            };
            cycles += 1;
            if report.dispatch.is_degraded() {
                warn!("Cycle {} degraded: {:?}", cycles, report.dispatch);
            }
        }

        info!("Service exited after {} cycles", cycles);
        Ok(cycles)
    }
}

/// Ctrl-C, or SIGTERM on unix
///
/// The SIGTERM handler is installed by [`ShutdownSignal::register`], so a
/// signal raised right after registration is never lost.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    pub fn register() -> Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    /// Resolves once either signal arrives
    pub async fn recv(self) {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Unable to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = {
            let mut terminate = self.terminate;
            async move {
                terminate.recv().await;
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate => {}
        }
        info!("Received shutdown signal");
    }
}

/// Cancel `token` once a shutdown signal arrives
pub fn cancel_on_signal(token: CancellationToken) -> Result<()> {
    let signal = ShutdownSignal::register()?;
    tokio::spawn(async move {
        signal.recv().await;
        token.cancel();
    });
    Ok(())
}
