//! Rotation map — sector trajectories relative to the benchmark.
//!
//! x: sector price change minus benchmark price change, y: volume ratio.
//! Each plottable sector is drawn as a line through its daily points with
//! the points themselves marked on top. The vertical line marks x = 0.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget,
    },
};
use rotationlab_runner::RotationMap;

use crate::theme::Theme;

pub const TITLE: &str = "Sector Performance Map";
pub const X_TITLE: &str = "Relative Strength (Sector PriceΔ - Benchmark)";
pub const Y_TITLE: &str = "Momentum (VolRatio)";

/// Axis bounds for the plottable points, padded and always containing x = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

fn padded(lo: f64, hi: f64) -> [f64; 2] {
    let range = hi - lo;
    let pad = if range > 0.0 { range * 0.1 } else { 0.5 };
    [lo - pad, hi + pad]
}

pub fn map_bounds(map: &RotationMap) -> Option<MapBounds> {
    let mut points = map.plottable().flat_map(|s| s.points.iter()).peekable();
    points.peek()?;

    let (mut x_lo, mut x_hi) = (0.0_f64, 0.0_f64);
    let (mut y_lo, mut y_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        x_lo = x_lo.min(p.relative_strength);
        x_hi = x_hi.max(p.relative_strength);
        y_lo = y_lo.min(p.momentum);
        y_hi = y_hi.max(p.momentum);
    }
    Some(MapBounds {
        x: padded(x_lo, x_hi),
        y: padded(y_lo, y_hi),
    })
}

fn axis_labels(bounds: [f64; 2], theme: &Theme) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| Span::styled(format!("{v:.2}"), theme.muted_style()))
        .collect()
}

pub struct RotationMapPanel<'a> {
    map: Option<&'a RotationMap>,
    theme: &'a Theme,
}

impl<'a> RotationMapPanel<'a> {
    pub fn new(map: Option<&'a RotationMap>, theme: &'a Theme) -> Self {
        Self { map, theme }
    }

    fn render_empty(&self, area: Rect, buf: &mut Buffer, message: &str) {
        let block = Block::default()
            .title(format!(" {TITLE} "))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .style(Style::default().bg(self.theme.background));
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(message.to_string(), self.theme.muted_style())),
        ];
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

impl<'a> Widget for RotationMapPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(map) = self.map else {
            self.render_empty(area, buf, "No rotation data for this run.");
            return;
        };
        let Some(bounds) = map_bounds(map) else {
            self.render_empty(area, buf, "No sector has two or more days to plot.");
            return;
        };

        let series: Vec<(&str, Vec<(f64, f64)>)> = map
            .plottable()
            .map(|s| {
                let data = s
                    .points
                    .iter()
                    .map(|p| (p.relative_strength, p.momentum))
                    .collect();
                (s.sector.as_str(), data)
            })
            .collect();
        let zero_line = [(0.0, bounds.y[0]), (0.0, bounds.y[1])];

        let mut datasets = vec![Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(self.theme.muted_style())
            .data(&zero_line)];
        for (i, (name, data)) in series.iter().enumerate() {
            let color = self.theme.sector_color(i);
            datasets.push(
                Dataset::default()
                    .name(name.to_string())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(data),
            );
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                    .data(data),
            );
        }

        let title = format!(
            " {TITLE} | vs {} | {} day(s) | {} sector(s) ",
            map.benchmark,
            map.window,
            series.len()
        );

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .style(Style::default().bg(self.theme.background)),
            )
            .x_axis(
                Axis::default()
                    .title(Span::styled(X_TITLE, self.theme.muted_style()))
                    .style(self.theme.muted_style())
                    .bounds(bounds.x)
                    .labels(axis_labels(bounds.x, self.theme)),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(Y_TITLE, self.theme.muted_style()))
                    .style(self.theme.muted_style())
                    .bounds(bounds.y)
                    .labels(axis_labels(bounds.y, self.theme)),
            )
            .legend_position(Some(LegendPosition::TopLeft))
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 1)));

        chart.render(area, buf);
    }
}
