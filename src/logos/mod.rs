//! Market logo cache
//!
//! Notifications use each market's logo as their icon. Logos are downloaded
//! once into a directory under the system temp root; the directory is treated
//! as present-or-absent as a whole, so an existing directory means no network
//! traffic at all.


use crate::client::ExchangeApi;
use crate::error::{Error, Result};
use crate::types::Market;
use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Logos fetched concurrently per batch
const DOWNLOAD_BATCH: usize = 8;

/// Result of [`LogoCache::ensure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoStatus {
    /// Directory already existed, nothing fetched
    AlreadyCached,
    /// Directory created and filled
    Populated { downloaded: usize, failed: usize },
    /// Directory could not be created or the market list could not be fetched.
    /// Notifications go out without icons.
    Unavailable { reason: String },
}

impl LogoStatus {
    pub fn is_degraded(&self) -> bool {
        match self {
            LogoStatus::AlreadyCached => false,
            LogoStatus::Populated { failed, .. } => *failed > 0,
            LogoStatus::Unavailable { .. } => true,
        }
    }
}

pub struct LogoCache {
    dir: PathBuf,
    exchange: Arc<dyn ExchangeApi>,
}

impl LogoCache {
    pub fn new(dir: impl Into<PathBuf>, exchange: Arc<dyn ExchangeApi>) -> Self {
        Self {
            dir: dir.into(),
            exchange,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Icon for a market symbol, if its logo made it into the cache
    pub async fn icon_path(&self, symbol: &str) -> Option<PathBuf> {
        icon_path(&self.dir, symbol).await
    }

    /// Populate the cache unless the directory already exists
    pub async fn ensure(&self) -> LogoStatus {
        if tokio::fs::metadata(&self.dir).await.is_ok() {
            debug!("Logo cache present at {}", self.dir.display());
            return LogoStatus::AlreadyCached;
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!("Failed to create logo cache {}: {}", self.dir.display(), e);
            return LogoStatus::Unavailable {
                reason: e.to_string(),
            };
        }

        let markets = match self.exchange.get_markets().await {
            Ok(markets) => markets,
            Err(e) => {
                warn!("Failed to fetch market list, skipping logos: {}", e);
                if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
                    warn!("Failed to roll back logo cache {}: {}", self.dir.display(), e);
                }
                return LogoStatus::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        info!("Downloading {} logos...", markets.len());

        let mut downloaded = 0;
        let mut failed = 0;
        for batch in markets.chunks(DOWNLOAD_BATCH) {
            let results = join_all(batch.iter().map(|m| self.download_logo(m))).await;
            for (market, result) in batch.iter().zip(results) {
                match result {
                    Ok(()) => downloaded += 1,
                    Err(e) => {
                        debug!("Logo for {} skipped: {}", market.symbol, e);
                        failed += 1;
                    }
                }
            }
        }

        info!("Logo cache ready: {} downloaded, {} missing", downloaded, failed);
        LogoStatus::Populated { downloaded, failed }
    }

    async fn download_logo(&self, market: &Market) -> Result<()> {
        let url = market
            .logo_url
            .as_deref()
            .ok_or_else(|| Error::Api(format!("no logo for {}", market.symbol)))?;
        let bytes = self.exchange.download(url).await?;
        tokio::fs::write(self.dir.join(market.logo_file_name()), bytes).await?;
        Ok(())
    }
}

/// `{dir}/{symbol}.png` when that file exists
pub async fn icon_path(dir: &Path, symbol: &str) -> Option<PathBuf> {
    let path = dir.join(format!("{}.png", symbol));
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Some(path),
        _ => None,
    }
}
