//! Model coordinates to canvas pixels
//!
//! The model speaks seconds from the chart start and heights in 0..1. The
//! canvas speaks pixels with y growing downwards. Half a stroke width is kept
//! free at the top, bottom and right edge so thick lines are not clipped.

use doseline_core::CurvePoint;
use iced::Point;

/// Maps chart coordinates into a rectangle starting at `(0, top)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapper {
    pub pixels_per_sec: f32,
    /// Height of the curve area
    pub height: f32,
    pub line_width: f32,
    /// Y offset of the curve area
    pub top: f32,
}

impl PixelMapper {
    /// Fit `total_width_secs` into `canvas_width` pixels
    pub fn new(total_width_secs: f64, canvas_width: f32, height: f32, line_width: f32, top: f32) -> Self {
        let usable = (canvas_width - line_width / 2.0).max(0.0) as f64;
        let pixels_per_sec = usable / total_width_secs;
        Self {
            pixels_per_sec: if pixels_per_sec.is_finite() {
                pixels_per_sec as f32
            } else {
                0.0
            },
            height,
            line_width,
            top,
        }
    }

    pub fn x(&self, seconds: f64) -> f32 {
        seconds as f32 * self.pixels_per_sec
    }

    /// Heights above 1 are drawn at the top edge
    pub fn y(&self, height: f64) -> f32 {
        let half = self.line_width / 2.0;
        let usable = (self.height - self.line_width).max(0.0);
        self.top + self.height - half - height.clamp(0.0, 1.0) as f32 * usable
    }

    /// Y of height zero
    pub fn baseline(&self) -> f32 {
        self.y(0.0)
    }

    pub fn point(&self, point: CurvePoint) -> Point {
        Point::new(self.x(point.seconds), self.y(point.height))
    }
}

/// Control points of a cubic from `from` to `to` with horizontal tangents at both ends
///
/// Chaining these gives a smooth curve through every key point without
/// overshooting above a plateau or below zero.
pub fn smooth_controls(from: Point, to: Point) -> (Point, Point) {
    let mid_x = from.x + (to.x - from.x) / 2.0;
    (Point::new(mid_x, from.y), Point::new(mid_x, to.y))
}
