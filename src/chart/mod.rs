//! Price charts attached to notifications
//!
//! [`ChartRenderer`] pulls recent candles for a market and hands the close
//! prices to a [`ChartSink`], which rasterizes them into a temporary PNG.

mod plotters_sink;

pub use plotters_sink::PlottersChart;

use crate::client::ExchangeApi;
use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::types::Tick;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;
use tracing::{debug, warn};

/// Rasterizes one (x, y) series to a PNG file
pub trait ChartSink: Send + Sync {
    fn render(&self, points: &[(f64, f64)], dest: &Path) -> Result<()>;
}

/// A rendered chart on disk. The file is deleted when this is dropped.
#[derive(Debug)]
pub struct ChartImage {
    path: TempPath,
}

impl ChartImage {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Result of [`ChartRenderer::render`]
#[derive(Debug)]
pub enum ChartOutcome {
    Rendered(ChartImage),
    /// Tick fetch or rendering failed; the notification goes out without a chart
    Unavailable(String),
}

impl ChartOutcome {
    pub fn into_image(self) -> Option<ChartImage> {
        match self {
            ChartOutcome::Rendered(image) => Some(image),
            ChartOutcome::Unavailable(_) => None,
        }
    }
}

pub struct ChartRenderer {
    exchange: Arc<dyn ExchangeApi>,
    sink: Arc<dyn ChartSink>,
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(exchange: Arc<dyn ExchangeApi>, sink: Arc<dyn ChartSink>, config: ChartConfig) -> Self {
        Self {
            exchange,
            sink,
            config,
        }
    }

    /// Render the last day of closes for `symbol`
    pub async fn render(&self, symbol: &str) -> ChartOutcome {
        match self.try_render(symbol).await {
            Ok(image) => ChartOutcome::Rendered(image),
            Err(e) => {
                warn!("No chart for {}: {}", symbol, e);
                ChartOutcome::Unavailable(e.to_string())
            }
        }
    }

    async fn try_render(&self, symbol: &str) -> Result<ChartImage> {
        let ticks = self.exchange.get_ticks(symbol, self.config.interval).await?;
        let points = series(&ticks, self.config.samples);
        if points.is_empty() {
            return Err(Error::Chart(format!("no ticks for {}", symbol)));
        }
        debug!("Rendering {} of {} ticks for {}", points.len(), ticks.len(), symbol);

        let path = tempfile::Builder::new()
            .prefix(&format!("{}-", symbol))
            .suffix(".png")
            .tempfile()?
            .into_temp_path();

        // The blocking task owns the temp path, so the file is removed even if
        // this future is dropped mid-render.
        let sink = self.sink.clone();
        tokio::task::spawn_blocking(move || -> Result<ChartImage> {
            sink.render(&points, &path)?;
            Ok(ChartImage { path })
        })
        .await
        .map_err(|e| Error::Chart(e.to_string()))?
    }
}

/// The last `samples` closes as (1-based index, price) points.
/// Shorter histories are used whole.
pub fn series(ticks: &[Tick], samples: usize) -> Vec<(f64, f64)> {
    let start = ticks.len().saturating_sub(samples);
    ticks[start..]
        .iter()
        .enumerate()
        .map(|(i, tick)| ((i + 1) as f64, tick.close.to_f64().unwrap_or_default()))
        .collect()
}
