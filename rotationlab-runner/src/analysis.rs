//! Sector analysis — fetch, reduce, aggregate and classify each sector.
//!
//! Sectors are processed in universe order, stocks in sector order, one at a
//! time. A stock that cannot be fetched or has fewer than two candles is
//! skipped; a sector with no usable stocks is left out of the result.

use crate::fetcher::{CandleFetcher, FetchError};
use rotationlab_core::data::{Sector, Universe};
use rotationlab_core::metrics::stock::MIN_CANDLES;
use rotationlab_core::metrics::{Classification, SectorMetrics, StockMetrics};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a stock contributed nothing to its sector.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("only {count} candle(s), need {}", MIN_CANDLES)]
    TooFewCandles { count: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedStock {
    pub sector: String,
    pub symbol: String,
    pub reason: String,
}

/// Aggregated, classified metrics for one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorResult {
    pub sector: String,
    pub classification: Classification,
    pub metrics: SectorMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorAnalysis {
    pub sectors: Vec<SectorResult>,
    pub skipped: Vec<SkippedStock>,
    /// Sectors dropped because no stock had usable data.
    pub empty_sectors: Vec<String>,
}

/// Fetch one stock and reduce it to metrics.
pub fn stock_metrics(
    fetcher: &CandleFetcher<'_>,
    symbol: &str,
    lookback_days: u32,
) -> Result<StockMetrics, SkipReason> {
    let candles = fetcher.fetch(symbol, lookback_days)?;
    StockMetrics::compute(&candles).ok_or(SkipReason::TooFewCandles {
        count: candles.len(),
    })
}

/// Metrics for every stock in `sector` that produced usable data.
pub fn analyze_sector(
    fetcher: &CandleFetcher<'_>,
    sector: &Sector,
    lookback_days: u32,
    skipped: &mut Vec<SkippedStock>,
) -> Option<SectorResult> {
    log::info!(
        "analyzing sector: {} ({} stocks)",
        sector.name,
        sector.symbols.len()
    );

    let mut stocks = Vec::with_capacity(sector.symbols.len());
    for symbol in &sector.symbols {
        match stock_metrics(fetcher, symbol, lookback_days) {
            Ok(m) => {
                log::debug!(
                    "{symbol}: Δ {:.2} vol× {:.2} σ {:.2}",
                    m.price_change,
                    m.volume_ratio,
                    m.volatility
                );
                stocks.push(m);
            }
            Err(reason) => {
                log::warn!("skipping {symbol}: {reason}");
                skipped.push(SkippedStock {
                    sector: sector.name.clone(),
                    symbol: symbol.clone(),
                    reason: reason.to_string(),
                });
            }
        }
        fetcher.pace();
    }

    let metrics = SectorMetrics::aggregate(&stocks)?;
    Some(SectorResult {
        sector: sector.name.clone(),
        classification: metrics.classification(),
        metrics,
    })
}

/// Run the analysis over every sector of the universe.
pub fn analyze_sectors(
    fetcher: &CandleFetcher<'_>,
    universe: &Universe,
    lookback_days: u32,
) -> SectorAnalysis {
    let mut analysis = SectorAnalysis::default();
    for sector in &universe.sectors {
        match analyze_sector(fetcher, sector, lookback_days, &mut analysis.skipped) {
            Some(result) => {
                log::info!(
                    "{}: {} ({} stocks)",
                    result.sector,
                    result.classification,
                    result.metrics.num_stocks_analyzed
                );
                analysis.sectors.push(result);
            }
            None => {
                log::warn!("no data for sector {}", sector.name);
                analysis.empty_sectors.push(sector.name.clone());
            }
        }
    }
    analysis
}
