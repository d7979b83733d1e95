//! Test doubles for the chart and notification sinks

use crate::chart::ChartSink;
use crate::error::{Error, Result};
use crate::notify::NotificationSink;
use crate::types::{MarketSummary, Notification, Tick};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// `count` half-hourly ticks with closes 1, 2, 3, ...
pub fn ticks(count: usize) -> Vec<Tick> {
    let start = Utc.with_ymd_and_hms(2017, 6, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| Tick {
            timestamp: start + Duration::minutes(30 * i as i64),
            close: Decimal::from(i as u64 + 1),
        })
        .collect()
}

pub fn summary(symbol: &str, last: Decimal, low: Decimal, high: Decimal, volume: Decimal) -> MarketSummary {
    MarketSummary {
        symbol: symbol.to_string(),
        last,
        low,
        high,
        base_volume: volume,
    }
}

/// Records every series it is asked to draw and writes a stub file
#[derive(Default)]
pub struct RecordingChart {
    pub rendered: Mutex<Vec<(Vec<(f64, f64)>, PathBuf)>>,
    pub fail: bool,
}

impl RecordingChart {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(Vec<(f64, f64)>, PathBuf)> {
        self.rendered.lock().unwrap().clone()
    }
}

impl ChartSink for RecordingChart {
    fn render(&self, points: &[(f64, f64)], dest: &Path) -> Result<()> {
        self.rendered
            .lock()
            .unwrap()
            .push((points.to_vec(), dest.to_path_buf()));
        if self.fail {
            return Err(Error::Chart("renderer broken".into()));
        }
        std::fs::write(dest, b"png")?;
        Ok(())
    }
}

/// Notification sink that records deliveries and can fail chosen symbols
#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<Notification>>,
    /// Whether the content image existed on disk at delivery time, per notification
    pub image_present: Mutex<Vec<bool>>,
    pub fail_titles: Vec<String>,
}

impl RecordingSink {
    pub fn failing_for(titles: &[&str]) -> Self {
        Self {
            fail_titles: titles.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        let present = notification
            .content_image
            .as_ref()
            .is_some_and(|p| p.exists());
        self.image_present.lock().unwrap().push(present);
        self.delivered.lock().unwrap().push(notification.clone());

        if self.fail_titles.contains(&notification.title) {
            return Err(Error::Notify(format!("rejected {}", notification.title)));
        }
        Ok(())
    }
}

/// Sink whose delivery never completes; only cancellation gets past it
#[derive(Default)]
pub struct StalledSink {
    pub attempts: Mutex<usize>,
}

#[async_trait]
impl NotificationSink for StalledSink {
    async fn deliver(&self, _notification: &Notification) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        std::future::pending::<()>().await;
        Ok(())
    }
}
