//! Candle — one trading day's OHLCV quote.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Daily OHLCV candle for a single instrument.
///
/// Series handed to the metrics are ordered by `timestamp` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    /// Intraday move: close minus open.
    pub fn body(&self) -> f64 {
        self.close - self.open
    }

    /// Returns true if any price field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high bounds the body from above, low from below.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Sort a series by timestamp ascending, keeping the last candle for duplicate timestamps.
pub fn canonicalize(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.timestamp);
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        match out.last_mut() {
            Some(prev) if prev.timestamp == candle.timestamp => *prev = candle,
            _ => out.push(candle),
        }
    }
    out
}
