//! Colors and sizes for timeline rendering

use doseline_core::SubstanceColor;
use iced::Color;

/// Chart background
pub const BACKGROUND: Color = Color::from_rgb(0.1, 0.1, 0.12);
/// Axis labels and rating labels
pub const LABEL_COLOR: Color = Color::from_rgb(0.75, 0.75, 0.78);
/// Rating marker lines
pub const RATING_COLOR: Color = Color::from_rgba(0.8, 0.8, 0.85, 0.7);
/// The "now" line
pub const CURRENT_TIME_COLOR: Color = Color::from_rgb(1.0, 1.0, 1.0);

/// Opacity of the area under solid segments
pub const AREA_ALPHA: f32 = 0.25;
/// Opacity of faded tails
pub const FADED_ALPHA: f32 = 0.3;

/// Concrete color of a palette entry
pub fn substance_color(color: SubstanceColor) -> Color {
    match color {
        SubstanceColor::Blue => Color::from_rgb(0.0, 0.48, 1.0),
        SubstanceColor::Brown => Color::from_rgb(0.64, 0.52, 0.37),
        SubstanceColor::Cyan => Color::from_rgb(0.2, 0.68, 0.9),
        SubstanceColor::Green => Color::from_rgb(0.2, 0.78, 0.35),
        SubstanceColor::Indigo => Color::from_rgb(0.35, 0.34, 0.84),
        SubstanceColor::Mint => Color::from_rgb(0.0, 0.78, 0.75),
        SubstanceColor::Orange => Color::from_rgb(1.0, 0.58, 0.0),
        SubstanceColor::Pink => Color::from_rgb(1.0, 0.18, 0.33),
        SubstanceColor::Purple => Color::from_rgb(0.69, 0.32, 0.87),
        SubstanceColor::Red => Color::from_rgb(1.0, 0.23, 0.19),
        SubstanceColor::Teal => Color::from_rgb(0.19, 0.69, 0.78),
        SubstanceColor::Yellow => Color::from_rgb(1.0, 0.8, 0.0),
    }
}

/// Same color with a different alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Color { a: alpha, ..color }
}

/// Sizes used when painting a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineStyle {
    /// Height of the curve area in pixels
    pub height: f32,
    /// Stroke width of curves
    pub line_width: f32,
    /// Stroke width of rating, note and "now" lines
    pub marker_line_width: f32,
    /// Gap between the curve area and each label strip
    pub space_to_labels: f32,
    /// Height of the label strips above and below the curves
    pub label_strip_height: f32,
    pub label_size: f32,
    /// Minimum gap between hour labels
    pub min_label_spacing_px: f32,
}

impl Default for TimelineStyle {
    fn default() -> Self {
        Self {
            height: 200.0,
            line_width: 5.0,
            marker_line_width: 3.0,
            space_to_labels: 5.0,
            label_strip_height: 16.0,
            label_size: 12.0,
            min_label_spacing_px: 40.0,
        }
    }
}

impl TimelineStyle {
    /// Total widget height including both label strips
    pub fn total_height(&self) -> f32 {
        self.height + 2.0 * (self.space_to_labels + self.label_strip_height)
    }

    /// Y offset of the curve area inside the widget
    pub fn chart_top(&self) -> f32 {
        self.label_strip_height + self.space_to_labels
    }
}
