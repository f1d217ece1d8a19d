//! RotationLab Runner — configuration, fetching, sector analysis, reporting.
//!
//! This crate builds on `rotationlab-core` to provide:
//! - Run configuration (TOML) and credentials from the environment
//! - A candle fetcher with symbol lookup, retry and request pacing
//! - Per-sector aggregation and classification
//! - Benchmark-relative rotation trajectories
//! - Console table, JSON and CSV report export

pub mod analysis;
pub mod config;
pub mod fetcher;
pub mod pipeline;
pub mod report;
pub mod trajectory;

pub use analysis::{analyze_sector, analyze_sectors, SectorAnalysis, SectorResult, SkipReason, SkippedStock};
pub use config::{credentials_from, credentials_from_env, BenchmarkConfig, ConfigError, RetrySettings, RunConfig};
pub use fetcher::{CandleFetcher, FetchError};
pub use pipeline::{analyze_report, attach_rotation};
pub use report::{load_report, save_report, ExportError, Report, SectorRow, SCHEMA_VERSION};
pub use trajectory::{
    build_rotation_map, DayPoint, RotationMap, RotationPoint, RotationSeries, SectorTrajectory,
};
