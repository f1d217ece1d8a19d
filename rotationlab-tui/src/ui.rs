//! Screen layout — the active view plus a one-line status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{key_bindings_help, App, View};
use crate::bar_panels::{Metric, MetricBars};
use crate::rotation_map::RotationMapPanel;
use crate::theme::Theme;

pub fn draw(f: &mut Frame, app: &App<'_>, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    match Metric::for_view(app.view) {
        Some(metric) => f.render_widget(MetricBars::new(&app.report.sectors, metric, theme), chunks[0]),
        None => f.render_widget(
            RotationMapPanel::new(app.report.rotation.as_ref(), theme),
            chunks[0],
        ),
    }

    draw_status(f, chunks[1], app, theme);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App<'_>, theme: &Theme) {
    let mut spans: Vec<Span> = Vec::new();

    for (i, view) in View::ALL.iter().enumerate() {
        let style = if *view == app.view {
            theme.border_style()
        } else {
            theme.muted_style()
        };
        spans.push(Span::styled(format!(" {}:{}", i + 1, view.label()), style));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(app.report.summary(), theme.muted_style()));
    spans.push(Span::raw(" | "));

    let hints: Vec<String> = key_bindings_help()
        .iter()
        .map(|(key, action)| format!("{key}: {action}"))
        .collect();
    spans.push(Span::styled(hints.join("  "), theme.muted_style()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{buffer_text, sample_report};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_draw_each_view() {
        let report = sample_report();
        let theme = Theme::default();
        let mut app = App::new(&report);
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();

        for view in View::ALL {
            app.show(view);
            terminal.draw(|f| draw(f, &app, &theme)).unwrap();
            let text = buffer_text(terminal.backend().buffer());
            assert!(text.contains("Leading 1"));
            match view {
                View::RotationMap => assert!(text.contains("Sector Performance Map")),
                other => assert!(text.contains(&format!("Average {} by Sector", other.label()))),
            }
        }
    }
}
