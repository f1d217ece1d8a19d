//! Parrot/neon theme tokens for the chart screen.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (titles, focus)
//! - **Positive**: Neon green (gains, Leading)
//! - **Negative**: Hot pink (losses, Weakening)
//! - **Warning**: Neon orange (Improving)
//! - **Neutral**: Cool purple (Lacking)
//! - **Muted**: Steel blue (axes, hints)

use ratatui::style::{Color, Style};
use rotationlab_core::metrics::Classification;

/// One color per sector line, cycled when there are more sectors than colors.
pub const SECTOR_PALETTE: [Color; 10] = [
    Color::Rgb(0, 255, 255),
    Color::Rgb(255, 20, 147),
    Color::Rgb(0, 255, 128),
    Color::Rgb(255, 140, 0),
    Color::Rgb(147, 112, 219),
    Color::Rgb(255, 255, 0),
    Color::Rgb(100, 149, 237),
    Color::Rgb(255, 99, 71),
    Color::Rgb(64, 224, 208),
    Color::Rgb(218, 112, 214),
];

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Green at or above zero, pink below.
    pub fn value_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn classification_color(&self, class: Classification) -> Color {
        match class {
            Classification::Leading => self.positive,
            Classification::Improving => self.warning,
            Classification::Weakening => self.negative,
            Classification::Lacking => self.neutral,
        }
    }

    pub fn sector_color(&self, index: usize) -> Color {
        SECTOR_PALETTE[index % SECTOR_PALETTE.len()]
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.accent)
    }
}
