//! Chart screen state and key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rotationlab_runner::Report;

/// Which chart fills the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    RotationMap,
    PriceChange,
    VolumeRatio,
    Volatility,
}

impl View {
    pub const ALL: [View; 4] = [
        View::RotationMap,
        View::PriceChange,
        View::VolumeRatio,
        View::Volatility,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::RotationMap => "Rotation Map",
            View::PriceChange => "Price Change",
            View::VolumeRatio => "Volume Ratio",
            View::Volatility => "Volatility",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct App<'a> {
    pub report: &'a Report,
    pub view: View,
    pub running: bool,
}

impl<'a> App<'a> {
    /// Starts on the rotation map when one was built, otherwise on the first bar panel.
    pub fn new(report: &'a Report) -> Self {
        let view = if report.rotation.is_some() {
            View::RotationMap
        } else {
            View::PriceChange
        };
        Self {
            report,
            view,
            running: true,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn previous_view(&mut self) {
        self.view = self.view.previous();
    }

    pub fn show(&mut self, view: View) {
        self.view = view;
    }
}

/// Map a key press to an action on the chart screen.
pub fn handle_key_event(app: &mut App<'_>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_view(),

        KeyCode::Char('1') => app.show(View::RotationMap),
        KeyCode::Char('2') => app.show(View::PriceChange),
        KeyCode::Char('3') => app.show(View::VolumeRatio),
        KeyCode::Char('4') => app.show(View::Volatility),
        _ => {}
    }
}

/// Key bindings help text
pub fn key_bindings_help() -> Vec<(&'static str, &'static str)> {
    vec![
        ("q / Esc", "Quit"),
        ("Tab / →", "Next view"),
        ("Shift+Tab / ←", "Previous view"),
        ("1-4", "Jump to view"),
    ]
}
