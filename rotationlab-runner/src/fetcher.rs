//! Candle fetcher — symbol lookup, retried range query, request pacing.
//!
//! Sits between the analysis loops and a `CandleProvider`. Lookup failures and
//! empty responses are not retried; transport errors are retried by the
//! `RetryPolicy`. Every successful request is followed by the pacing delay.

use chrono::NaiveDateTime;
use rotationlab_core::data::{
    CandleProvider, CandleRequest, DataError, RetryError, RetryPolicy, Sleeper, SymbolTable,
};
use rotationlab_core::domain::{Candle, Exchange, InstrumentToken};
use std::time::Duration;
use thiserror::Error;

/// Why a symbol produced no candles.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("token not found for {symbol}")]
    NotFound { symbol: String },

    #[error("no candle data for {symbol}")]
    NoData { symbol: String },

    #[error("{symbol} unavailable after {attempts} attempt(s): {source}")]
    Unavailable {
        symbol: String,
        attempts: u32,
        #[source]
        source: DataError,
    },

    #[error("{symbol}: {source}")]
    Rejected {
        symbol: String,
        #[source]
        source: DataError,
    },
}

pub struct CandleFetcher<'a> {
    provider: &'a dyn CandleProvider,
    symbols: &'a SymbolTable,
    sleeper: &'a dyn Sleeper,
    retry: RetryPolicy,
    request_delay: Duration,
    as_of: NaiveDateTime,
}

impl<'a> CandleFetcher<'a> {
    /// Fetcher with the default retry policy and a 500 ms pacing delay.
    pub fn new(
        provider: &'a dyn CandleProvider,
        symbols: &'a SymbolTable,
        sleeper: &'a dyn Sleeper,
        as_of: NaiveDateTime,
    ) -> Self {
        Self {
            provider,
            symbols,
            sleeper,
            retry: RetryPolicy::default(),
            request_delay: Duration::from_millis(500),
            as_of,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn exchange(&self) -> Exchange {
        self.symbols.exchange()
    }

    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    /// Sleep for the pacing delay.
    pub fn pace(&self) {
        if !self.request_delay.is_zero() {
            self.sleeper.sleep(self.request_delay);
        }
    }

    /// Daily candles for `symbol` over the last `days` calendar days.
    pub fn fetch(&self, symbol: &str, days: u32) -> Result<Vec<Candle>, FetchError> {
        let token = self.symbols.lookup(symbol).ok_or_else(|| FetchError::NotFound {
            symbol: symbol.to_string(),
        })?;
        self.fetch_token(symbol, token, days)
    }

    /// Daily candles for an instrument token; `label` names it in errors and logs.
    pub fn fetch_token(
        &self,
        label: &str,
        token: &InstrumentToken,
        days: u32,
    ) -> Result<Vec<Candle>, FetchError> {
        let request =
            CandleRequest::daily_lookback(self.exchange(), token.clone(), self.as_of, days);
        log::debug!(
            "{label}: {} {} → {} via {}",
            request.token,
            request.from_param(),
            request.to_param(),
            self.provider.name()
        );

        let candles = self
            .retry
            .run(label, self.sleeper, |_| {
                let result = self.provider.candles(&request);
                if result.is_ok() {
                    self.pace();
                }
                result
            })
            .map_err(|e| match e {
                RetryError::Exhausted { attempts, last } => FetchError::Unavailable {
                    symbol: label.to_string(),
                    attempts,
                    source: last,
                },
                RetryError::Permanent(source) => FetchError::Rejected {
                    symbol: label.to_string(),
                    source,
                },
            })?;

        if candles.is_empty() {
            return Err(FetchError::NoData {
                symbol: label.to_string(),
            });
        }
        Ok(candles)
    }
}
