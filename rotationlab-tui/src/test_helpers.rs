//! Test helpers for creating mock reports

use rotationlab_core::domain::Exchange;
use rotationlab_core::metrics::SectorMetrics;
use rotationlab_runner::{
    Report, RotationMap, RotationPoint, RotationSeries, SectorAnalysis, SectorResult,
};

fn sector(name: &str, p: f64, v: f64, s: f64) -> SectorResult {
    let metrics = SectorMetrics {
        avg_price_change: p,
        avg_volume_ratio: v,
        avg_volatility: s,
        num_stocks_analyzed: 4,
    };
    SectorResult {
        sector: name.to_string(),
        classification: metrics.classification(),
        metrics,
    }
}

fn series(name: &str, points: &[(f64, f64)]) -> RotationSeries {
    RotationSeries {
        sector: name.to_string(),
        points: points
            .iter()
            .enumerate()
            .map(|(day, &(x, y))| RotationPoint {
                day,
                relative_strength: x,
                momentum: y,
            })
            .collect(),
    }
}

pub fn sample_report() -> Report {
    let analysis = SectorAnalysis {
        sectors: vec![
            sector("Banking", 0.6, 1.2, 1.0),
            sector("Pharma", -0.4, 0.5, 3.0),
            sector("Auto", 0.35, 0.7, 5.0),
        ],
        skipped: vec![],
        empty_sectors: vec![],
    };
    let rotation = RotationMap {
        benchmark: "Nifty 50".to_string(),
        window: 3,
        benchmark_changes: vec![Some(10.0), Some(-5.0), Some(15.0)],
        trajectories: vec![],
        series: vec![
            series("Banking", &[(-10.0, 0.5), (6.0, 0.5), (-15.0, 1.75)]),
            series("Pharma", &[(2.0, 0.9), (3.5, 1.1)]),
            series("Auto", &[(1.0, 1.0)]),
        ],
    };
    let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 8)
        .unwrap()
        .and_hms_opt(15, 30, 0)
        .unwrap();
    Report::from_analysis(analysis, Exchange::Nse, 7, at).with_rotation(rotation)
}

/// Flatten a rendered buffer into one string.
pub fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut content = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            if let Some(cell) = buf.cell((area.x + x, area.y + y)) {
                content.push_str(cell.symbol());
            }
        }
        content.push('\n');
    }
    content
}
