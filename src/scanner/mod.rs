//! Pump & dump scanner
//!
//! Narrows one poll cycle's market summaries down to the markets worth a
//! notification. Stages run in a fixed order:
//! 1. Base currency - only markets quoted in the configured base (`BTC-...`)
//! 2. Volume - base volume strictly above the minimum
//! 3. Pump - `last / low` above the pump ratio
//! 4. Dump - `last / high` below the dump ratio
//!
//! Pump and dump are both taken from the volume-filtered set, so a market can
//! land in both lists.


use crate::config::Thresholds;
use crate::types::MarketSummary;

/// Markets flagged in one poll cycle
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub pumps: Vec<MarketSummary>,
    pub dumps: Vec<MarketSummary>,
}

impl Candidates {
    pub fn len(&self) -> usize {
        self.pumps.len() + self.dumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pumps followed by dumps, one entry per notification to send
    pub fn into_flagged(self) -> Vec<MarketSummary> {
        let mut flagged = self.pumps;
        flagged.extend(self.dumps);
        flagged
    }
}

/// Stateless filter pipeline over market summaries
#[derive(Debug, Clone)]
pub struct MarketFilter {
    thresholds: Thresholds,
    prefix: String,
}

impl Default for MarketFilter {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl MarketFilter {
    pub fn new(thresholds: Thresholds) -> Self {
        let prefix = format!("{}-", thresholds.base_currency);
        Self { thresholds, prefix }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run every stage and split the survivors into pumps and dumps
    pub fn scan(&self, summaries: &[MarketSummary]) -> Candidates {
        let liquid = self.filter_volume(&self.filter_base_currency(summaries));

        Candidates {
            pumps: self.filter_pump(&liquid),
            dumps: self.filter_dump(&liquid),
        }
    }

    pub fn filter_base_currency(&self, markets: &[MarketSummary]) -> Vec<MarketSummary> {
        markets
            .iter()
            .filter(|m| m.symbol.starts_with(&self.prefix))
            .cloned()
            .collect()
    }

    pub fn filter_volume(&self, markets: &[MarketSummary]) -> Vec<MarketSummary> {
        markets
            .iter()
            .filter(|m| m.base_volume > self.thresholds.min_volume)
            .cloned()
            .collect()
    }

    /// Markets trading well above their period low. A zero low never qualifies.
    pub fn filter_pump(&self, markets: &[MarketSummary]) -> Vec<MarketSummary> {
        markets
            .iter()
            .filter(|m| {
                m.low_ratio()
                    .is_some_and(|ratio| ratio > self.thresholds.pump_ratio)
            })
            .cloned()
            .collect()
    }

    /// Markets trading well below their period high. A zero high never qualifies.
    pub fn filter_dump(&self, markets: &[MarketSummary]) -> Vec<MarketSummary> {
        markets
            .iter()
            .filter(|m| {
                m.high_ratio()
                    .is_some_and(|ratio| ratio < self.thresholds.dump_ratio)
            })
            .cloned()
            .collect()
    }
}
