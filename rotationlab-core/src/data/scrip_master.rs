//! Instrument master: maps trading symbols to broker instrument tokens.
//!
//! The broker publishes one JSON array covering every segment. Only records of
//! the configured exchange are kept.

use super::provider::DataError;
use crate::domain::{Exchange, InstrumentToken};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const INSTRUMENT_MASTER_URL: &str =
    "https://margincalculator.angelbroking.com/OpenAPI_File/files/OpenAPIScripMaster.json";

/// Cash-segment series suffix on NSE trading symbols (e.g. `SBIN-EQ`).
const EQUITY_SERIES_SUFFIX: &str = "-EQ";

/// One row of the instrument master. Fields not needed here are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScripRecord {
    pub token: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instrumenttype: String,
    pub exch_seg: String,
}

/// Symbol → token table for one exchange.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    exchange: Exchange,
    tokens: HashMap<String, InstrumentToken>,
}

impl SymbolTable {
    /// Build from master records; a later duplicate symbol replaces an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = ScripRecord>, exchange: Exchange) -> Self {
        let tokens = records
            .into_iter()
            .filter(|r| r.exch_seg == exchange.as_str())
            .map(|r| (r.symbol, InstrumentToken(r.token)))
            .collect();
        Self { exchange, tokens }
    }

    /// Parse the master JSON document.
    pub fn from_json(json: &str, exchange: Exchange) -> Result<Self, DataError> {
        let records: Vec<ScripRecord> = serde_json::from_str(json).map_err(|e| {
            DataError::ResponseFormatChanged(format!("instrument master: {e}"))
        })?;
        Ok(Self::from_records(records, exchange))
    }

    /// Download and parse the master from `url`.
    pub fn download(url: &str, exchange: Exchange) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        log::info!("fetching instrument master list");
        let resp = client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                context: "instrument master".into(),
            });
        }
        let records: Vec<ScripRecord> = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("instrument master: {e}"))
        })?;
        let table = Self::from_records(records, exchange);
        log::info!("instrument master: {} {exchange} symbols", table.len());
        Ok(table)
    }

    /// Token for `symbol`, trying the exact symbol and then the equity series.
    pub fn lookup(&self, symbol: &str) -> Option<&InstrumentToken> {
        self.tokens.get(symbol).or_else(|| {
            if symbol.ends_with(EQUITY_SERIES_SUFFIX) {
                None
            } else {
                self.tokens.get(&format!("{symbol}{EQUITY_SERIES_SUFFIX}"))
            }
        })
    }

    pub fn exchange(&self) -> Exchange {
        self.exchange
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
