//! Property tests for rotation trajectories.
//!
//! Uses proptest to verify:
//! 1. Sector trajectories always span the full window
//! 2. A rotation point exists only where the sector and benchmark both have a value

mod common;

use common::candles;
use proptest::prelude::*;
use rotationlab_runner::trajectory::{relative_rotation, sector_days, trailing_changes};
use rotationlab_runner::{DayPoint, SectorTrajectory};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_row() -> impl Strategy<Value = (f64, f64, u64)> {
    (1.0..5000.0_f64, 1.0..5000.0_f64, 0u64..1_000_000)
}

fn arb_series() -> impl Strategy<Value = Vec<Vec<(f64, f64, u64)>>> {
    prop::collection::vec(prop::collection::vec(arb_row(), 0..12), 0..6)
}

fn arb_day() -> impl Strategy<Value = DayPoint> {
    (
        prop::option::of(-50.0..50.0_f64),
        prop::option::of(0.0..5.0_f64),
    )
        .prop_map(|(price_change, volume_ratio)| DayPoint {
            price_change,
            volume_ratio,
        })
}

// ── 1. Window length ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn sector_days_span_the_window(stocks in arb_series(), window in 1usize..10) {
        let series: Vec<_> = stocks.iter().map(|rows| candles(rows)).collect();
        let days = sector_days(&series, window);
        prop_assert_eq!(days.len(), window);
    }

    #[test]
    fn trailing_changes_span_the_window(rows in prop::collection::vec(arb_row(), 0..12), window in 1usize..10) {
        let changes = trailing_changes(&candles(&rows), window);
        prop_assert_eq!(changes.len(), window);
        prop_assert_eq!(changes.iter().filter(|c| c.is_some()).count(), rows.len().min(window));
    }
}

// ── 2. Rotation points ───────────────────────────────────────────────

proptest! {
    #[test]
    fn rotation_points_need_sector_and_benchmark(
        days in prop::collection::vec(arb_day(), 1..10),
        bench in prop::collection::vec(prop::option::of(-100.0..100.0_f64), 0..10),
    ) {
        let trajectory = SectorTrajectory { sector: "Auto".into(), days: days.clone() };
        let series = relative_rotation(&trajectory, &bench);

        for p in &series.points {
            let day = &days[p.day];
            let b = bench.get(p.day).copied().flatten();
            prop_assert!(b.is_some());
            prop_assert!(day.price_change.is_some());
            prop_assert_eq!(day.volume_ratio, Some(p.momentum));
        }
        let expected = days
            .iter()
            .enumerate()
            .filter(|(i, d)| {
                d.price_change.is_some()
                    && d.volume_ratio.is_some()
                    && bench.get(*i).copied().flatten().is_some()
            })
            .count();
        prop_assert_eq!(series.points.len(), expected);
    }
}
