//! One full run in two stages: sector analysis, then the optional rotation map.

use crate::analysis::analyze_sectors;
use crate::config::RunConfig;
use crate::fetcher::CandleFetcher;
use crate::report::Report;
use crate::trajectory::build_rotation_map;
use rotationlab_core::data::Universe;

/// Analyze `universe` into a report without a rotation map.
pub fn analyze_report(
    fetcher: &CandleFetcher<'_>,
    config: &RunConfig,
    universe: &Universe,
) -> Report {
    log::info!(
        "analyzing {} sectors ({} stocks) on {}",
        universe.sectors.len(),
        universe.symbol_count(),
        fetcher.exchange()
    );

    let analysis = analyze_sectors(fetcher, universe, config.lookback_days);
    let report = Report::from_analysis(
        analysis,
        fetcher.exchange(),
        config.lookback_days,
        fetcher.as_of(),
    );
    log::info!("{}", report.summary());
    report
}

/// Build the rotation map and attach it to `report`.
///
/// An unavailable benchmark leaves the report without a rotation map.
pub fn attach_rotation(
    fetcher: &CandleFetcher<'_>,
    config: &RunConfig,
    universe: &Universe,
    report: Report,
) -> Report {
    match build_rotation_map(fetcher, universe, &config.benchmark, config.trajectory_days) {
        Ok(rotation) => report.with_rotation(rotation),
        Err(e) => {
            log::error!("rotation map skipped: {e}");
            report
        }
    }
}
