//! StockMetrics — one candle series reduced to three numbers.

use super::{mean, round2, sample_std};
use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// Minimum series length for usable metrics.
pub const MIN_CANDLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockMetrics {
    /// Last close minus last open.
    pub price_change: f64,
    /// Last volume over mean volume of the window.
    pub volume_ratio: f64,
    /// Sample std of day-over-day close returns, in percent.
    pub volatility: f64,
}

impl StockMetrics {
    /// Compute all metrics, rounded to 2 decimals. `None` below `MIN_CANDLES`.
    pub fn compute(candles: &[Candle]) -> Option<Self> {
        if candles.len() < MIN_CANDLES {
            return None;
        }
        Some(Self {
            price_change: round2(price_change(candles)),
            volume_ratio: round2(volume_ratio(candles)),
            volatility: round2(volatility(candles)),
        })
    }
}

/// Last candle's close minus open; 0 for an empty series.
pub fn price_change(candles: &[Candle]) -> f64 {
    candles.last().map(Candle::body).unwrap_or(0.0)
}

/// Volume of the candle at `index` over the mean volume of the whole series.
///
/// Returns 0 when the mean is 0 or the index is out of range.
pub fn volume_ratio_at(candles: &[Candle], index: usize) -> f64 {
    let Some(candle) = candles.get(index) else {
        return 0.0;
    };
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume as f64).collect();
    match mean(&volumes) {
        Some(avg) if avg > 0.0 => candle.volume as f64 / avg,
        _ => 0.0,
    }
}

/// Last volume over mean volume; 0 when the mean is 0.
pub fn volume_ratio(candles: &[Candle]) -> f64 {
    if candles.is_empty() {
        return 0.0;
    }
    volume_ratio_at(candles, candles.len() - 1)
}

/// Day-over-day fractional close changes. Non-finite results (zero or NaN
/// previous close) are dropped.
pub fn pct_returns(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .filter(|r| r.is_finite())
        .collect()
}

/// Sample std of returns × 100; 0 with fewer than 2 returns.
pub fn volatility(candles: &[Candle]) -> f64 {
    sample_std(&pct_returns(candles))
        .map(|s| s * 100.0)
        .unwrap_or(0.0)
}
