//! Shared fixtures: a scripted candle provider and a small symbol table.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rotationlab_core::data::{CandleProvider, CandleRequest, DataError, ScripRecord, SymbolTable};
use rotationlab_core::domain::{Candle, Exchange};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Reply {
    Candles(Vec<Candle>),
    Transient,
    Reject,
}

/// Replies are consumed in order per token; the last one repeats.
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, token: &str, replies: Vec<Reply>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(token.to_string(), replies.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, token: &str) -> usize {
        self.calls().iter().filter(|t| t.as_str() == token).count()
    }
}

impl CandleProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, DataError> {
        let token = request.token.as_str().to_string();
        self.calls.lock().unwrap().push(token.clone());

        let mut replies = self.replies.lock().unwrap();
        let reply = match replies.get_mut(&token) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Candles(c)) => Ok(c),
            Some(Reply::Transient) => Err(DataError::NetworkUnreachable("connection reset".into())),
            Some(Reply::Reject) => Err(DataError::Api {
                code: "AB1004".into(),
                message: "Something Went Wrong".into(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

pub fn symbols(pairs: &[(&str, &str)]) -> SymbolTable {
    let records = pairs.iter().map(|(symbol, token)| ScripRecord {
        token: token.to_string(),
        symbol: symbol.to_string(),
        name: symbol.trim_end_matches("-EQ").to_string(),
        instrumenttype: String::new(),
        exch_seg: "NSE".into(),
    });
    SymbolTable::from_records(records, Exchange::Nse)
}

/// Daily candles from (open, close, volume), starting 2024-03-04 IST.
pub fn candles(rows: &[(f64, f64, u64)]) -> Vec<Candle> {
    let start = DateTime::parse_from_rfc3339("2024-03-04T00:00:00+05:30").unwrap();
    rows.iter()
        .enumerate()
        .map(|(i, &(open, close, volume))| Candle {
            timestamp: start + Duration::days(i as i64),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume,
        })
        .collect()
}

pub fn as_of() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(15, 30, 0)
        .unwrap()
}
