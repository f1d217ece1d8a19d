//! Per-metric bar panels: one horizontal bar per sector, drawn from zero.
//!
//! Negative values extend left of the zero column, positive values right.
//! Bars take their sector's classification color.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use rotationlab_core::metrics::SectorMetrics;
use rotationlab_runner::SectorResult;

use crate::app::View;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    PriceChange,
    VolumeRatio,
    Volatility,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::PriceChange => "Price Change",
            Metric::VolumeRatio => "Volume Ratio",
            Metric::Volatility => "Volatility",
        }
    }

    pub fn value(&self, m: &SectorMetrics) -> f64 {
        match self {
            Metric::PriceChange => m.avg_price_change,
            Metric::VolumeRatio => m.avg_volume_ratio,
            Metric::Volatility => m.avg_volatility,
        }
    }

    pub fn for_view(view: View) -> Option<Self> {
        match view {
            View::RotationMap => None,
            View::PriceChange => Some(Metric::PriceChange),
            View::VolumeRatio => Some(Metric::VolumeRatio),
            View::Volatility => Some(Metric::Volatility),
        }
    }
}

/// Value range widened to include zero.
pub fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Column offset of `value` within a plot `width` cells wide.
pub fn column(value: f64, lo: f64, hi: f64, width: u16) -> u16 {
    let range = hi - lo;
    if range <= 0.0 || width == 0 {
        return 0;
    }
    let frac = ((value - lo) / range).clamp(0.0, 1.0);
    (frac * f64::from(width.saturating_sub(1))).round() as u16
}

pub struct MetricBars<'a> {
    sectors: &'a [SectorResult],
    metric: Metric,
    theme: &'a Theme,
}

impl<'a> MetricBars<'a> {
    pub fn new(sectors: &'a [SectorResult], metric: Metric, theme: &'a Theme) -> Self {
        Self {
            sectors,
            metric,
            theme,
        }
    }
}

impl<'a> Widget for MetricBars<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Average {} by Sector ", self.metric.label());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.sectors.is_empty() {
            buf.set_string(inner.x, inner.y, "No sectors to show", self.theme.muted_style());
            return;
        }

        let value_width: u16 = 9;
        let name_width = self
            .sectors
            .iter()
            .map(|s| s.sector.chars().count() as u16)
            .max()
            .unwrap_or(0)
            .min(inner.width / 3);
        let plot_left = inner.x + name_width + 1;
        let plot_width = inner.width.saturating_sub(name_width + 1 + value_width);
        if plot_width < 4 {
            return;
        }

        let values: Vec<f64> = self
            .sectors
            .iter()
            .map(|s| self.metric.value(&s.metrics))
            .collect();
        let (lo, hi) = value_range(&values);
        let zero = column(0.0, lo, hi, plot_width);

        for (i, (sector, value)) in self.sectors.iter().zip(&values).enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.bottom() {
                break;
            }

            let name: String = sector.sector.chars().take(name_width as usize).collect();
            buf.set_string(
                inner.x,
                y,
                format!("{name:>width$}", width = name_width as usize),
                Style::default().fg(self.theme.text_secondary),
            );

            let at = column(*value, lo, hi, plot_width);
            let style = Style::default().fg(self.theme.classification_color(sector.classification));
            for x in at.min(zero)..=at.max(zero) {
                buf.set_string(plot_left + x, y, "\u{2588}", style); // █
            }

            buf.set_string(
                plot_left + plot_width + 1,
                y,
                format!("{value:>8.2}"),
                Style::default()
                    .fg(self.theme.value_color(*value))
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}
