//! SectorMetrics — arithmetic mean of constituent stock metrics.

use super::classify::Classification;
use super::stock::StockMetrics;
use super::{mean, round2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorMetrics {
    pub avg_price_change: f64,
    pub avg_volume_ratio: f64,
    pub avg_volatility: f64,
    pub num_stocks_analyzed: usize,
}

impl SectorMetrics {
    /// Average the given stocks, rounded to 2 decimals. `None` when there are none.
    pub fn aggregate(stocks: &[StockMetrics]) -> Option<Self> {
        let field_mean = |f: fn(&StockMetrics) -> f64| {
            let values: Vec<f64> = stocks.iter().map(f).collect();
            mean(&values).map(round2)
        };
        Some(Self {
            avg_price_change: field_mean(|s| s.price_change)?,
            avg_volume_ratio: field_mean(|s| s.volume_ratio)?,
            avg_volatility: field_mean(|s| s.volatility)?,
            num_stocks_analyzed: stocks.len(),
        })
    }

    pub fn classification(&self) -> Classification {
        Classification::of(self)
    }
}
