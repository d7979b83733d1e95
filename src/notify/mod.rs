//! Desktop notifications
//!
//! [`NotificationSink`] is the delivery seam. [`TerminalNotifier`] posts to the
//! macOS notification center through the `terminal-notifier` program, and
//! [`NotificationDispatcher`] fans one notification per flagged market out
//! over it.

mod dispatcher;

pub use dispatcher::{DispatchReport, NotificationDispatcher};

use crate::config::{ExchangeConfig, NotificationConfig};
use crate::error::{Error, Result};
use crate::types::{MarketSummary, Notification};
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Delivers a notification somewhere a human will see it
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// Posts notifications by running `terminal-notifier`
#[derive(Debug, Clone)]
pub struct TerminalNotifier {
    program: String,
}

impl TerminalNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.program.clone())
    }

    /// Command-line arguments for one notification; absent paths are omitted
    pub fn args(notification: &Notification) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-title".into(),
            notification.title.clone().into(),
            "-subtitle".into(),
            notification.subtitle.clone().into(),
            "-message".into(),
            notification.message.clone().into(),
            "-group".into(),
            notification.group.clone().into(),
            "-sound".into(),
            notification.sound.clone().into(),
            "-open".into(),
            notification.link.clone().into(),
        ];
        if let Some(icon) = &notification.app_icon {
            args.push("-appIcon".into());
            args.push(icon.clone().into_os_string());
        }
        if let Some(image) = &notification.content_image {
            args.push("-contentImage".into());
            args.push(image.clone().into_os_string());
        }
        args
    }
}

#[async_trait]
impl NotificationSink for TerminalNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        debug!("Posting notification for {}", notification.title);
        let output = Command::new(&self.program)
            .args(Self::args(notification))
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::Notify(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Build the notification for one flagged market.
///
/// The message reads `L {from low}% | H {from high}% | {volume}b`.
pub fn build_notification(
    market: &MarketSummary,
    exchange: &ExchangeConfig,
    sound: &str,
    app_icon: Option<PathBuf>,
    content_image: Option<PathBuf>,
) -> Notification {
    let low_change = market.low_change_pct().to_f64().unwrap_or_default();
    let high_change = market.high_change_pct().to_f64().unwrap_or_default();
    let volume = market.base_volume.to_f64().unwrap_or_default();

    Notification {
        title: market.symbol.clone(),
        subtitle: exchange.name.clone(),
        message: format!("L {:.1}% | H {:.1}% | {:.0}b", low_change, high_change, volume),
        group: format!("com.{}.price", market.symbol),
        sound: sound.to_string(),
        link: format!("{}{}", exchange.market_url, market.symbol),
        app_icon,
        content_image,
    }
}
