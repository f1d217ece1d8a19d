//! Rotation trajectories — per-day sector moves relative to a benchmark.
//!
//! For a trailing window of N days (oldest first), each sector gets the mean
//! close-minus-open and the mean volume ratio of its stocks on that day. The
//! benchmark gets its own close-minus-open per day. The rotation map plots
//! `sector − benchmark` against the volume ratio.

use crate::config::BenchmarkConfig;
use crate::fetcher::{CandleFetcher, FetchError};
use rotationlab_core::data::Universe;
use rotationlab_core::domain::Candle;
use rotationlab_core::metrics::mean;
use rotationlab_core::metrics::stock::volume_ratio_at;
use serde::{Deserialize, Serialize};

/// Sectors need at least this many points to be drawn.
pub const MIN_PLOT_POINTS: usize = 2;

/// One day of a sector trajectory. `None` when no stock had that day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayPoint {
    pub price_change: Option<f64>,
    pub volume_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorTrajectory {
    pub sector: String,
    /// Oldest day first; always `window` entries.
    pub days: Vec<DayPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationPoint {
    /// Position in the window, 0 = oldest.
    pub day: usize,
    /// Sector price change minus benchmark price change.
    pub relative_strength: f64,
    /// Sector volume ratio.
    pub momentum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationSeries {
    pub sector: String,
    pub points: Vec<RotationPoint>,
}

impl RotationSeries {
    pub fn is_plottable(&self) -> bool {
        self.points.len() >= MIN_PLOT_POINTS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationMap {
    pub benchmark: String,
    pub window: usize,
    pub benchmark_changes: Vec<Option<f64>>,
    pub trajectories: Vec<SectorTrajectory>,
    pub series: Vec<RotationSeries>,
}

impl RotationMap {
    /// Series with enough points to draw.
    pub fn plottable(&self) -> impl Iterator<Item = &RotationSeries> {
        self.series.iter().filter(|s| s.is_plottable())
    }
}

/// Close minus open for each of the last `window` candles, oldest first.
///
/// Entries are `None` where the series is shorter than the window.
pub fn trailing_changes(candles: &[Candle], window: usize) -> Vec<Option<f64>> {
    (1..=window)
        .rev()
        .map(|day| candles.len().checked_sub(day).map(|i| candles[i].body()))
        .collect()
}

/// Volume over series mean volume for each of the last `window` candles, oldest first.
pub fn trailing_volume_ratios(candles: &[Candle], window: usize) -> Vec<Option<f64>> {
    (1..=window)
        .rev()
        .map(|day| {
            candles
                .len()
                .checked_sub(day)
                .map(|i| volume_ratio_at(candles, i))
        })
        .collect()
}

/// Average the stocks of one sector day by day.
pub fn sector_days(series: &[Vec<Candle>], window: usize) -> Vec<DayPoint> {
    let changes: Vec<Vec<Option<f64>>> =
        series.iter().map(|c| trailing_changes(c, window)).collect();
    let ratios: Vec<Vec<Option<f64>>> = series
        .iter()
        .map(|c| trailing_volume_ratios(c, window))
        .collect();

    (0..window)
        .map(|k| {
            let day_changes: Vec<f64> = changes.iter().filter_map(|c| c[k]).collect();
            let day_ratios: Vec<f64> = ratios.iter().filter_map(|r| r[k]).collect();
            DayPoint {
                price_change: mean(&day_changes),
                volume_ratio: mean(&day_ratios),
            }
        })
        .collect()
}

/// Pair a sector trajectory with the benchmark, keeping days where both exist.
pub fn relative_rotation(trajectory: &SectorTrajectory, benchmark: &[Option<f64>]) -> RotationSeries {
    let points = trajectory
        .days
        .iter()
        .enumerate()
        .filter_map(|(day, point)| {
            let bench = benchmark.get(day).copied().flatten()?;
            Some(RotationPoint {
                day,
                relative_strength: point.price_change? - bench,
                momentum: point.volume_ratio?,
            })
        })
        .collect();
    RotationSeries {
        sector: trajectory.sector.clone(),
        points,
    }
}

/// Fetch every stock of every sector once over the window and build trajectories.
pub fn sector_trajectories(
    fetcher: &CandleFetcher<'_>,
    universe: &Universe,
    window: u32,
) -> Vec<SectorTrajectory> {
    universe
        .sectors
        .iter()
        .map(|sector| {
            let series: Vec<Vec<Candle>> = sector
                .symbols
                .iter()
                .filter_map(|symbol| match fetcher.fetch(symbol, window) {
                    Ok(candles) => Some(candles),
                    Err(e) => {
                        log::debug!("trajectory: skipping {symbol}: {e}");
                        None
                    }
                })
                .collect();
            SectorTrajectory {
                sector: sector.name.clone(),
                days: sector_days(&series, window as usize),
            }
        })
        .collect()
}

/// Benchmark close-minus-open per trailing day.
///
/// An empty benchmark response yields a window of `None`.
pub fn benchmark_changes(
    fetcher: &CandleFetcher<'_>,
    benchmark: &BenchmarkConfig,
    window: u32,
) -> Result<Vec<Option<f64>>, FetchError> {
    let candles = match fetcher.fetch_token(&benchmark.name, &benchmark.token(), window) {
        Ok(candles) => candles,
        Err(FetchError::NoData { .. }) => {
            log::warn!("{}: no candle data, nothing will be plotted", benchmark.name);
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    let changes = trailing_changes(&candles, window as usize);
    log::info!("{} price changes: {:?}", benchmark.name, changes);
    Ok(changes)
}

/// Benchmark first, then every sector; fails only if the benchmark fetch errors.
pub fn build_rotation_map(
    fetcher: &CandleFetcher<'_>,
    universe: &Universe,
    benchmark: &BenchmarkConfig,
    window: u32,
) -> Result<RotationMap, FetchError> {
    let bench = benchmark_changes(fetcher, benchmark, window)?;
    let trajectories = sector_trajectories(fetcher, universe, window);
    let series: Vec<RotationSeries> = trajectories
        .iter()
        .map(|t| relative_rotation(t, &bench))
        .collect();

    for s in &series {
        if !s.is_plottable() {
            log::info!(
                "{}: {} point(s), not plotted",
                s.sector,
                s.points.len()
            );
        }
    }

    Ok(RotationMap {
        benchmark: benchmark.name.clone(),
        window: window as usize,
        benchmark_changes: bench,
        trajectories,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn series(rows: &[(f64, f64, u64)]) -> Vec<Candle> {
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

    #[test]
    fn trailing_changes_pad_short_series() {
        let c = series(&[(10.0, 11.0, 1), (11.0, 10.5, 1), (10.5, 12.0, 1)]);
        assert_eq!(
            trailing_changes(&c, 5),
            vec![None, None, Some(1.0), Some(-0.5), Some(1.5)]
        );
        assert_eq!(trailing_changes(&c, 2), vec![Some(-0.5), Some(1.5)]);
    }

    #[test]
    fn trailing_volume_ratio_uses_whole_series_mean() {
        let c = series(&[(1.0, 1.0, 100), (1.0, 1.0, 200), (1.0, 1.0, 300)]);
        assert_eq!(
            trailing_volume_ratios(&c, 3),
            vec![Some(0.5), Some(1.0), Some(1.5)]
        );
    }

    #[test]
    fn sector_days_average_available_stocks() {
        let long = series(&[(10.0, 12.0, 100), (12.0, 13.0, 100), (13.0, 12.0, 100)]);
        let short = series(&[(5.0, 6.0, 50), (6.0, 8.0, 150)]);
        let days = sector_days(&[long, short], 3);
        assert_eq!(days[0].price_change, Some(2.0));
        assert_eq!(days[1].price_change, Some(1.5)); // (1 + 2) / 2
        assert_eq!(days[2].price_change, Some(0.0)); // (-1 + 1) / 2
        assert_eq!(days[0].volume_ratio, Some(1.0));
        assert_eq!(days[1].volume_ratio, Some(0.75)); // (1 + 0.5) / 2
    }

    #[test]
    fn sector_days_with_no_stocks_are_empty() {
        let days = sector_days(&[], 5);
        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|d| d.price_change.is_none() && d.volume_ratio.is_none()));
    }

    #[test]
    fn relative_rotation_skips_missing_days() {
        let trajectory = SectorTrajectory {
            sector: "Media".into(),
            days: vec![
                DayPoint { price_change: Some(1.0), volume_ratio: Some(0.9) },
                DayPoint { price_change: None, volume_ratio: None },
                DayPoint { price_change: Some(2.0), volume_ratio: Some(1.1) },
                DayPoint { price_change: Some(-1.0), volume_ratio: Some(1.3) },
            ],
        };
        let bench = vec![Some(0.5), Some(1.0), None, Some(-2.0)];
        let s = relative_rotation(&trajectory, &bench);
        assert_eq!(s.points.len(), 2);
        assert_eq!(s.points[0].day, 0);
        assert_eq!(s.points[0].relative_strength, 0.5);
        assert_eq!(s.points[1].day, 3);
        assert_eq!(s.points[1].relative_strength, 1.0);
        assert_eq!(s.points[1].momentum, 1.3);
        assert!(s.is_plottable());
    }

    #[test]
    fn single_point_series_is_not_plottable() {
        let s = RotationSeries {
            sector: "Telecom".into(),
            points: vec![RotationPoint { day: 4, relative_strength: 0.1, momentum: 1.0 }],
        };
        assert!(!s.is_plottable());
    }
}
