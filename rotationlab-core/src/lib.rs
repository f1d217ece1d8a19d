//! RotationLab Core — domain types, brokerage data layer, metrics.
//!
//! This crate contains the pieces of the sector rotation pipeline that do not
//! depend on run configuration or output:
//! - Domain types (candles, exchanges, intervals, instrument tokens)
//! - SmartAPI session login, instrument master and candle provider
//! - Retry policy with exponential backoff and a sleep seam for tests
//! - Built-in sector universe
//! - Per-stock metrics, sector aggregation and the four-bucket classifier

pub mod data;
pub mod domain;
pub mod metrics;
