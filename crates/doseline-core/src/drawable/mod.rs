//! Timeline drawables: the curve geometry of a single dose (or a stack of doses)
//!
//! Every drawable is expressed in chart coordinates: seconds from the chart
//! start on the x axis, and a non-normalized height (in "common dose" units)
//! on the y axis. Normalization happens later at the group level and never
//! touches the stored geometry.
//!
//! ## Shapes
//!
//! Which shape a dose gets depends on which phases the duration profile
//! provides. See [`shapes::SHAPE_PRIORITY`] for the fallback order and
//! [`cumulative`] for how redoses are stacked into one curve.

pub mod cumulative;
pub mod shapes;

pub use cumulative::build_full_cumulative;
pub use shapes::{first_applicable_shape, LinePlacement, ShapeBuilder, ShapeOptions, SHAPE_PRIORITY};

/// Heights closer than this are treated as equal when merging curves
pub(crate) const HEIGHT_EPSILON: f64 = 1e-9;

/// A key point of a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Seconds from the chart start
    pub seconds: f64,
    pub height: f64,
}

impl CurvePoint {
    pub const fn new(seconds: f64, height: f64) -> Self {
        Self { seconds, height }
    }
}

/// How a segment should be stroked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Phase with known timing
    Solid,
    /// Phase whose timing is derived or uncertain
    Dotted,
    /// Open-ended tail fading out
    Faded,
}

/// A straight piece of a curve between two key points
///
/// Renderers are free to smooth it, the key points are what matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub from: CurvePoint,
    pub to: CurvePoint,
    pub style: LineStyle,
}

impl CurveSegment {
    pub fn width(&self) -> f64 {
        self.to.seconds - self.from.seconds
    }

    /// Linear height at `seconds`; zero-width segments jump straight to `to`
    pub fn height_at(&self, seconds: f64) -> f64 {
        let width = self.width();
        if width <= 0.0 {
            return self.to.height;
        }
        let t = ((seconds - self.from.seconds) / width).clamp(0.0, 1.0);
        self.from.height + (self.to.height - self.from.height) * t
    }

    fn scaled(&self, divisor: f64) -> Self {
        Self {
            from: CurvePoint::new(self.from.seconds, self.from.height / divisor),
            to: CurvePoint::new(self.to.seconds, self.to.height / divisor),
            style: self.style,
        }
    }
}

/// Identifies a drawable variant without its geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Full,
    OnsetComeupPeakTotal,
    OnsetComeupTotal,
    OnsetTotal,
    Total,
    OnsetComeupPeak,
    OnsetComeup,
    Onset,
    FullCumulative,
    NoTimeline,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Full => "full",
            ShapeKind::OnsetComeupPeakTotal => "onset-comeup-peak-total",
            ShapeKind::OnsetComeupTotal => "onset-comeup-total",
            ShapeKind::OnsetTotal => "onset-total",
            ShapeKind::Total => "total",
            ShapeKind::OnsetComeupPeak => "onset-comeup-peak",
            ShapeKind::OnsetComeup => "onset-comeup",
            ShapeKind::Onset => "onset",
            ShapeKind::FullCumulative => "full-cumulative",
            ShapeKind::NoTimeline => "no-timeline",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Piecewise-linear curve geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    segments: Vec<CurveSegment>,
}

impl Curve {
    /// Build from consecutive segments
    ///
    /// Time never decreases along the result: a non-finite or earlier time
    /// is pulled up to the previous point, and a non-finite first time
    /// becomes zero. Non-finite heights become zero.
    pub fn from_segments(segments: Vec<CurveSegment>) -> Self {
        let mut previous: Option<f64> = None;
        let mut clean = |p: CurvePoint| {
            let seconds = match (p.seconds.is_finite(), previous) {
                (true, Some(last)) => p.seconds.max(last),
                (true, None) => p.seconds,
                (false, Some(last)) => last,
                (false, None) => 0.0,
            };
            previous = Some(seconds);
            CurvePoint::new(seconds, if p.height.is_finite() { p.height.max(0.0) } else { 0.0 })
        };
        Self {
            segments: segments
                .into_iter()
                .map(|s| {
                    let from = clean(s.from);
                    let to = clean(s.to);
                    CurveSegment { from, to, style: s.style }
                })
                .collect(),
        }
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn key_points(&self) -> Vec<CurvePoint> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            points.push(first.from);
        }
        points.extend(self.segments.iter().map(|s| s.to));
        points
    }

    pub fn start_seconds(&self) -> f64 {
        self.segments.first().map_or(0.0, |s| s.from.seconds)
    }

    pub fn end_seconds(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.to.seconds)
    }

    pub fn max_height(&self) -> f64 {
        self.key_points()
            .iter()
            .map(|p| p.height)
            .fold(0.0, f64::max)
    }

    /// Height approaching `seconds` from the left (0 outside the curve)
    pub fn height_before(&self, seconds: f64) -> f64 {
        self.segments
            .iter()
            .rev()
            .find(|s| s.width() > 0.0 && s.from.seconds < seconds && seconds <= s.to.seconds)
            .map_or(0.0, |s| s.height_at(seconds))
    }

    /// Height leaving `seconds` to the right (0 outside the curve)
    pub fn height_after(&self, seconds: f64) -> f64 {
        self.segments
            .iter()
            .find(|s| s.width() > 0.0 && s.from.seconds <= seconds && seconds < s.to.seconds)
            .map_or(0.0, |s| s.height_at(seconds))
    }

    /// Zero-width segments sitting at `seconds`, in drawing order
    pub fn vertical_steps_at(&self, seconds: f64) -> impl Iterator<Item = &CurveSegment> + '_ {
        self.segments
            .iter()
            .filter(move |s| s.width() <= 0.0 && s.from.seconds == seconds)
    }

    fn scaled(&self, divisor: f64) -> Vec<CurveSegment> {
        self.segments.iter().map(|s| s.scaled(divisor)).collect()
    }
}

/// Dose without duration data, drawn as a dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseMarker {
    /// Seconds from chart start to the ingestion
    pub seconds: f64,
    pub onset_delay_in_hours: f64,
}

/// One renderable element of a timeline lane
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineDrawable {
    Full(Curve),
    OnsetComeupPeakTotal(Curve),
    OnsetComeupTotal(Curve),
    OnsetTotal(Curve),
    Total(Curve),
    OnsetComeupPeak(Curve),
    OnsetComeup(Curve),
    Onset(Curve),
    FullCumulative(Curve),
    NoTimeline(DoseMarker),
}

impl TimelineDrawable {
    pub fn kind(&self) -> ShapeKind {
        match self {
            TimelineDrawable::Full(_) => ShapeKind::Full,
            TimelineDrawable::OnsetComeupPeakTotal(_) => ShapeKind::OnsetComeupPeakTotal,
            TimelineDrawable::OnsetComeupTotal(_) => ShapeKind::OnsetComeupTotal,
            TimelineDrawable::OnsetTotal(_) => ShapeKind::OnsetTotal,
            TimelineDrawable::Total(_) => ShapeKind::Total,
            TimelineDrawable::OnsetComeupPeak(_) => ShapeKind::OnsetComeupPeak,
            TimelineDrawable::OnsetComeup(_) => ShapeKind::OnsetComeup,
            TimelineDrawable::Onset(_) => ShapeKind::Onset,
            TimelineDrawable::FullCumulative(_) => ShapeKind::FullCumulative,
            TimelineDrawable::NoTimeline(_) => ShapeKind::NoTimeline,
        }
    }

    pub fn curve(&self) -> Option<&Curve> {
        match self {
            TimelineDrawable::Full(curve)
            | TimelineDrawable::OnsetComeupPeakTotal(curve)
            | TimelineDrawable::OnsetComeupTotal(curve)
            | TimelineDrawable::OnsetTotal(curve)
            | TimelineDrawable::Total(curve)
            | TimelineDrawable::OnsetComeupPeak(curve)
            | TimelineDrawable::OnsetComeup(curve)
            | TimelineDrawable::Onset(curve)
            | TimelineDrawable::FullCumulative(curve) => Some(curve),
            TimelineDrawable::NoTimeline(_) => None,
        }
    }

    pub fn is_curve(&self) -> bool {
        self.curve().is_some()
    }

    /// Key points in chart seconds and non-normalized height
    pub fn key_points(&self) -> Vec<CurvePoint> {
        match self {
            TimelineDrawable::NoTimeline(marker) => vec![CurvePoint::new(marker.seconds, 0.0)],
            _ => self.curve().map(Curve::key_points).unwrap_or_default(),
        }
    }

    /// Tallest point before normalization; dots have no height
    pub fn non_normalized_height(&self) -> f64 {
        self.curve().map_or(0.0, Curve::max_height)
    }

    /// Where the drawn line ends, in seconds from the chart start
    pub fn end_of_line_relative_to_start_in_seconds(&self) -> f64 {
        match self {
            TimelineDrawable::NoTimeline(marker) => marker.seconds,
            _ => self.curve().map_or(0.0, Curve::end_seconds),
        }
    }

    /// Segments with heights divided by `divisor`
    pub fn normalized_segments(&self, divisor: f64) -> Vec<CurveSegment> {
        self.curve().map(|c| c.scaled(divisor)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tent() -> Curve {
        Curve::from_segments(vec![
            CurveSegment {
                from: CurvePoint::new(0.0, 0.0),
                to: CurvePoint::new(10.0, 2.0),
                style: LineStyle::Solid,
            },
            CurveSegment {
                from: CurvePoint::new(10.0, 2.0),
                to: CurvePoint::new(20.0, 0.0),
                style: LineStyle::Dotted,
            },
        ])
    }

    #[test]
    fn test_curve_key_points() {
        let curve = tent();
        let points = curve.key_points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], CurvePoint::new(10.0, 2.0));
        assert_eq!(curve.max_height(), 2.0);
        assert_eq!(curve.end_seconds(), 20.0);
    }

    #[test]
    fn test_one_sided_heights() {
        let curve = tent();
        assert_eq!(curve.height_before(5.0), 1.0);
        assert_eq!(curve.height_after(5.0), 1.0);
        assert_eq!(curve.height_before(0.0), 0.0);
        assert_eq!(curve.height_after(20.0), 0.0);
        assert_eq!(curve.height_before(-1.0), 0.0);
        assert_eq!(curve.height_after(25.0), 0.0);
    }

    #[test]
    fn test_vertical_jump() {
        let curve = Curve::from_segments(vec![
            CurveSegment {
                from: CurvePoint::new(0.0, 0.0),
                to: CurvePoint::new(5.0, 0.0),
                style: LineStyle::Dotted,
            },
            CurveSegment {
                from: CurvePoint::new(5.0, 0.0),
                to: CurvePoint::new(5.0, 1.0),
                style: LineStyle::Solid,
            },
            CurveSegment {
                from: CurvePoint::new(5.0, 1.0),
                to: CurvePoint::new(9.0, 1.0),
                style: LineStyle::Solid,
            },
        ]);
        assert_eq!(curve.height_before(5.0), 0.0);
        assert_eq!(curve.height_after(5.0), 1.0);
        assert_eq!(curve.segments()[1].height_at(5.0), 1.0);
        let steps: Vec<&CurveSegment> = curve.vertical_steps_at(5.0).collect();
        assert_eq!(steps, vec![&curve.segments()[1]]);
        assert_eq!(curve.vertical_steps_at(0.0).count(), 0);
    }

    #[test]
    fn test_non_finite_geometry_is_cleaned() {
        let curve = Curve::from_segments(vec![CurveSegment {
            from: CurvePoint::new(f64::NAN, 0.0),
            to: CurvePoint::new(10.0, f64::INFINITY),
            style: LineStyle::Solid,
        }]);
        assert!(curve
            .key_points()
            .iter()
            .all(|p| p.seconds.is_finite() && p.height.is_finite()));
    }

    #[test]
    fn test_overflowed_time_never_runs_backwards() {
        let curve = Curve::from_segments(vec![
            CurveSegment {
                from: CurvePoint::new(600.0, 0.0),
                to: CurvePoint::new(f64::INFINITY, 1.0),
                style: LineStyle::Dotted,
            },
            CurveSegment {
                from: CurvePoint::new(f64::INFINITY, 1.0),
                to: CurvePoint::new(300.0, 0.0),
                style: LineStyle::Dotted,
            },
        ]);
        assert!(curve.segments().iter().all(|s| s.width() >= 0.0));
        assert_eq!(curve.key_points()[1], CurvePoint::new(600.0, 1.0));
        assert_eq!(curve.end_seconds(), 600.0);
    }

    #[test]
    fn test_drawable_accessors() {
        let drawable = TimelineDrawable::Total(tent());
        assert_eq!(drawable.kind(), ShapeKind::Total);
        assert_eq!(drawable.non_normalized_height(), 2.0);
        assert_eq!(drawable.end_of_line_relative_to_start_in_seconds(), 20.0);
        let normalized = drawable.normalized_segments(4.0);
        assert_eq!(normalized[0].to.height, 0.5);

        let dot = TimelineDrawable::NoTimeline(DoseMarker {
            seconds: 42.0,
            onset_delay_in_hours: 0.0,
        });
        assert_eq!(dot.non_normalized_height(), 0.0);
        assert_eq!(dot.end_of_line_relative_to_start_in_seconds(), 42.0);
        assert_eq!(dot.key_points(), vec![CurvePoint::new(42.0, 0.0)]);
        assert!(dot.normalized_segments(1.0).is_empty());
    }
}
