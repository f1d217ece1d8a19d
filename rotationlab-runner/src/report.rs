//! Reporting and export — console table, JSON and CSV artifacts.
//!
//! The report is the single value handed to the CLI and the chart screen.
//! Persisted JSON carries a `schema_version`; newer versions are rejected on
//! load.

use crate::analysis::{SectorAnalysis, SectorResult, SkippedStock};
use crate::trajectory::RotationMap;
use chrono::NaiveDateTime;
use rotationlab_core::domain::Exchange;
use rotationlab_core::metrics::Classification;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use thiserror::Error;

pub const SCHEMA_VERSION: u32 = 1;

pub const REPORT_FILE: &str = "report.json";
pub const SECTORS_FILE: &str = "sectors.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported schema version {found} (max supported: {})", SCHEMA_VERSION)]
    UnsupportedSchema { found: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: u32,
    pub generated_at: NaiveDateTime,
    pub exchange: Exchange,
    pub lookback_days: u32,
    pub sectors: Vec<SectorResult>,
    pub skipped: Vec<SkippedStock>,
    pub empty_sectors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationMap>,
}

/// One console table row.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SectorRow {
    #[tabled(rename = "Sector")]
    pub sector: String,
    #[tabled(rename = "Classification")]
    pub classification: String,
    #[tabled(rename = "PriceΔ")]
    pub price_change: String,
    #[tabled(rename = "VolRatio")]
    pub volume_ratio: String,
    #[tabled(rename = "Volatility")]
    pub volatility: String,
    #[tabled(rename = "Stocks Analyzed")]
    pub stocks: String,
}

impl From<&SectorResult> for SectorRow {
    fn from(r: &SectorResult) -> Self {
        Self {
            sector: r.sector.clone(),
            classification: r.classification.to_string(),
            price_change: format!("{:.2}", r.metrics.avg_price_change),
            volume_ratio: format!("{:.2}", r.metrics.avg_volume_ratio),
            volatility: format!("{:.2}", r.metrics.avg_volatility),
            stocks: r.metrics.num_stocks_analyzed.to_string(),
        }
    }
}

impl Report {
    pub fn from_analysis(
        analysis: SectorAnalysis,
        exchange: Exchange,
        lookback_days: u32,
        generated_at: NaiveDateTime,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at,
            exchange,
            lookback_days,
            sectors: analysis.sectors,
            skipped: analysis.skipped,
            empty_sectors: analysis.empty_sectors,
            rotation: None,
        }
    }

    pub fn with_rotation(mut self, rotation: RotationMap) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn rows(&self) -> Vec<SectorRow> {
        self.sectors.iter().map(SectorRow::from).collect()
    }

    pub fn render_table(&self) -> String {
        Table::new(self.rows()).to_string()
    }

    /// Number of sectors per classification, in `Classification::ALL` order.
    pub fn class_counts(&self) -> Vec<(Classification, usize)> {
        Classification::ALL
            .iter()
            .map(|c| {
                let n = self
                    .sectors
                    .iter()
                    .filter(|s| s.classification == *c)
                    .count();
                (*c, n)
            })
            .collect()
    }

    /// One-line summary, e.g. `Leading 2 · Improving 1 · Weakening 0 · Lacking 5`.
    pub fn summary(&self) -> String {
        self.class_counts()
            .iter()
            .map(|(c, n)| format!("{c} {n}"))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &Report) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn import_json(json: &str) -> Result<Report, ExportError> {
    let report: Report = serde_json::from_str(json)?;
    if report.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: report.schema_version,
        });
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: sector, classification, avg_price_change, avg_volume_ratio,
/// avg_volatility, num_stocks_analyzed
pub fn write_sectors_csv<W: io::Write>(sectors: &[SectorResult], out: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "sector",
        "classification",
        "avg_price_change",
        "avg_volume_ratio",
        "avg_volatility",
        "num_stocks_analyzed",
    ])?;
    for s in sectors {
        wtr.write_record([
            s.sector.as_str(),
            s.classification.label(),
            &format!("{:.2}", s.metrics.avg_price_change),
            &format!("{:.2}", s.metrics.avg_volume_ratio),
            &format!("{:.2}", s.metrics.avg_volatility),
            &s.metrics.num_stocks_analyzed.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `report.json` and `sectors.csv` into `dir`, creating it if needed.
pub fn save_report(report: &Report, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;

    let json_path = dir.join(REPORT_FILE);
    std::fs::write(&json_path, export_json(report)?).map_err(io_err(&json_path))?;

    let csv_path = dir.join(SECTORS_FILE);
    let file = std::fs::File::create(&csv_path).map_err(io_err(&csv_path))?;
    write_sectors_csv(&report.sectors, file)?;

    log::info!("report written to {}", dir.display());
    Ok(vec![json_path, csv_path])
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ExportError {
    let path = path.to_path_buf();
    move |source| ExportError::Io { path, source }
}

/// Load a report from an export directory.
pub fn load_report(dir: &Path) -> Result<Report, ExportError> {
    let path = dir.join(REPORT_FILE);
    let json = std::fs::read_to_string(&path).map_err(io_err(&path))?;
    import_json(&json)
}
