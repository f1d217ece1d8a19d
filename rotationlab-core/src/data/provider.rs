//! Candle provider trait and structured error types.
//!
//! The CandleProvider trait abstracts over the brokerage so the fetcher can be
//! driven by a mock in tests. Providers don't know about symbol lookup, retries
//! or pacing; those live one layer up.

use crate::domain::{Candle, Exchange, InstrumentToken, Interval};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire format for the `fromdate` / `todate` request parameters.
pub const REQUEST_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Structured error types for provider operations.
///
/// These are designed to be displayable in both log lines and the final report.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status}: {context}")]
    Http { status: u16, context: String },

    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("request rejected ({code}): {message}")]
    Api { code: String, message: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures, throttling, server errors and unparseable bodies are
    /// transient. Rejections, auth failures and schema changes are not.
    pub fn is_transient(&self) -> bool {
        match self {
            DataError::NetworkUnreachable(_)
            | DataError::RateLimited { .. }
            | DataError::InvalidResponse(_) => true,
            DataError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// One historical candle query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleRequest {
    pub exchange: Exchange,
    pub token: InstrumentToken,
    pub interval: Interval,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl CandleRequest {
    /// Daily candles covering `days` calendar days up to `end`.
    pub fn daily_lookback(
        exchange: Exchange,
        token: InstrumentToken,
        end: NaiveDateTime,
        days: u32,
    ) -> Self {
        Self {
            exchange,
            token,
            interval: Interval::OneDay,
            from: end - Duration::days(i64::from(days)),
            to: end,
        }
    }

    pub fn from_param(&self) -> String {
        self.from.format(REQUEST_DATETIME_FORMAT).to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format(REQUEST_DATETIME_FORMAT).to_string()
    }
}

/// Trait for candle sources (SmartAPI, mocks).
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Run one range query. An empty vector means the provider had no candles.
    fn candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, DataError>;
}
