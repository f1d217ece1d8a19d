//! Four-bucket sector classification.

use super::sector::SectorMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Leading,
    Improving,
    Weakening,
    Lacking,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Leading,
        Classification::Improving,
        Classification::Weakening,
        Classification::Lacking,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Leading => "Leading",
            Classification::Improving => "Improving",
            Classification::Weakening => "Weakening",
            Classification::Lacking => "Lacking",
        }
    }

    /// Classify aggregated sector metrics.
    pub fn of(metrics: &SectorMetrics) -> Self {
        classify(
            metrics.avg_price_change,
            metrics.avg_volume_ratio,
            metrics.avg_volatility,
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold cascade; the first matching rule wins.
pub fn classify(price_change: f64, volume_ratio: f64, volatility: f64) -> Classification {
    if price_change > 0.5 && volume_ratio > 1.0 && volatility < 2.0 {
        Classification::Leading
    } else if price_change > 0.3 && volume_ratio > 0.6 {
        Classification::Improving
    } else if price_change < -0.3 && volume_ratio < 0.6 {
        Classification::Weakening
    } else {
        Classification::Lacking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_cases() {
        assert_eq!(classify(0.6, 1.2, 1.0), Classification::Leading);
        assert_eq!(classify(0.35, 0.7, 5.0), Classification::Improving);
        assert_eq!(classify(-0.4, 0.5, 3.0), Classification::Weakening);
        assert_eq!(classify(0.1, 0.1, 1.0), Classification::Lacking);
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(classify(0.5, 1.2, 1.0), Classification::Improving);
        assert_eq!(classify(0.6, 1.0, 1.0), Classification::Improving);
        assert_eq!(classify(0.6, 1.2, 2.0), Classification::Improving);
        assert_eq!(classify(0.3, 0.7, 1.0), Classification::Lacking);
        assert_eq!(classify(-0.3, 0.5, 1.0), Classification::Lacking);
        assert_eq!(classify(-0.4, 0.6, 1.0), Classification::Lacking);
    }

    #[test]
    fn leading_falls_through_to_improving_on_high_volatility() {
        assert_eq!(classify(2.0, 3.0, 10.0), Classification::Improving);
    }

    #[test]
    fn nan_inputs_are_lacking() {
        assert_eq!(classify(f64::NAN, 1.2, 1.0), Classification::Lacking);
    }

    #[test]
    fn of_sector_metrics() {
        let m = SectorMetrics {
            avg_price_change: 0.6,
            avg_volume_ratio: 1.2,
            avg_volatility: 1.0,
            num_stocks_analyzed: 3,
        };
        assert_eq!(Classification::of(&m), Classification::Leading);
        assert_eq!(m.classification().to_string(), "Leading");
    }
}
