//! Curve shapes for a single dose
//!
//! Each builder needs a specific set of phases. A lane tries the builders in
//! [`SHAPE_PRIORITY`] order and keeps the first one that produces anything.

use super::{Curve, CurvePoint, CurveSegment, LineStyle, ShapeKind, TimelineDrawable};
use crate::duration::{PhaseSeconds, RoaDuration};

/// Tunables shared by all shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeOptions {
    /// Length of the faded tail after an onset-only ramp, as a fraction of the onset
    pub onset_tail_fraction: f64,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            onset_tail_fraction: 0.25,
        }
    }
}

/// Where and how tall one dose is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlacement {
    /// Seconds from chart start to the ingestion
    pub ingestion_seconds: f64,
    pub onset_delay_seconds: f64,
    /// Position within each duration range (0..1)
    pub weight: f64,
    /// Non-normalized peak height
    pub height: f64,
}

impl LinePlacement {
    /// Seconds from chart start at which the curve begins
    pub fn curve_start(&self) -> f64 {
        self.ingestion_seconds + self.onset_delay_seconds
    }
}

/// A shape together with the function that builds it
#[derive(Clone, Copy)]
pub struct ShapeBuilder {
    pub kind: ShapeKind,
    pub build: fn(&PhaseSeconds, &LinePlacement, &ShapeOptions) -> Option<TimelineDrawable>,
}

impl std::fmt::Debug for ShapeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeBuilder").field("kind", &self.kind).finish()
    }
}

/// Per-dose shapes from richest to coarsest
pub const SHAPE_PRIORITY: [ShapeBuilder; 8] = [
    ShapeBuilder { kind: ShapeKind::Full, build: full },
    ShapeBuilder { kind: ShapeKind::OnsetComeupPeakTotal, build: onset_comeup_peak_total },
    ShapeBuilder { kind: ShapeKind::OnsetComeupTotal, build: onset_comeup_total },
    ShapeBuilder { kind: ShapeKind::OnsetTotal, build: onset_total },
    ShapeBuilder { kind: ShapeKind::Total, build: total },
    ShapeBuilder { kind: ShapeKind::OnsetComeupPeak, build: onset_comeup_peak },
    ShapeBuilder { kind: ShapeKind::OnsetComeup, build: onset_comeup },
    ShapeBuilder { kind: ShapeKind::Onset, build: onset },
];

/// The shape a profile would get, evaluated at the midpoint weight
///
/// Presence of phases does not depend on the weight, so this is the shape
/// every dose of the lane ends up with.
pub fn first_applicable_shape(roa_duration: &RoaDuration) -> Option<ShapeKind> {
    let phases = roa_duration.phases_at(0.5);
    let placement = LinePlacement {
        ingestion_seconds: 0.0,
        onset_delay_seconds: 0.0,
        weight: 0.5,
        height: 1.0,
    };
    let options = ShapeOptions::default();
    SHAPE_PRIORITY
        .iter()
        .find(|builder| (builder.build)(&phases, &placement, &options).is_some())
        .map(|builder| builder.kind)
}

/// Appends segments at offsets measured from the curve start
struct CurveBuilder {
    origin: f64,
    cursor: CurvePoint,
    segments: Vec<CurveSegment>,
}

impl CurveBuilder {
    fn starting_at(origin: f64) -> Self {
        Self {
            origin,
            cursor: CurvePoint::new(origin, 0.0),
            segments: Vec::with_capacity(4),
        }
    }

    fn to(mut self, offset: f64, height: f64, style: LineStyle) -> Self {
        // Never run backwards, a short total simply collapses the tail
        let target = self.origin + offset;
        let seconds = if target.is_finite() {
            target.max(self.cursor.seconds)
        } else {
            self.cursor.seconds
        };
        let to = CurvePoint::new(seconds, height);
        self.segments.push(CurveSegment {
            from: self.cursor,
            to,
            style,
        });
        self.cursor = to;
        self
    }

    fn finish(self) -> Curve {
        Curve::from_segments(self.segments)
    }
}

/// Onset, comeup, peak and offset: the four-phase curve
pub fn full(phases: &PhaseSeconds, at: &LinePlacement, _options: &ShapeOptions) -> Option<TimelineDrawable> {
    let (o, c, p, f) = (phases.onset?, phases.comeup?, phases.peak?, phases.offset?);
    let h = at.height;
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(o, 0.0, LineStyle::Dotted)
        .to(o + c, h, LineStyle::Solid)
        .to(o + c + p, h, LineStyle::Solid)
        .to(o + c + p + f, 0.0, LineStyle::Solid)
        .finish();
    Some(TimelineDrawable::Full(curve))
}

pub fn onset_comeup_peak_total(
    phases: &PhaseSeconds,
    at: &LinePlacement,
    _options: &ShapeOptions,
) -> Option<TimelineDrawable> {
    let (o, c, p, t) = (phases.onset?, phases.comeup?, phases.peak?, phases.total?);
    let h = at.height;
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(o, 0.0, LineStyle::Dotted)
        .to(o + c, h, LineStyle::Solid)
        .to(o + c + p, h, LineStyle::Solid)
        .to(t, 0.0, LineStyle::Dotted)
        .finish();
    Some(TimelineDrawable::OnsetComeupPeakTotal(curve))
}

pub fn onset_comeup_total(
    phases: &PhaseSeconds,
    at: &LinePlacement,
    _options: &ShapeOptions,
) -> Option<TimelineDrawable> {
    let (o, c, t) = (phases.onset?, phases.comeup?, phases.total?);
    let h = at.height;
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(o, 0.0, LineStyle::Dotted)
        .to(o + c, h, LineStyle::Solid)
        .to(t, 0.0, LineStyle::Dotted)
        .finish();
    Some(TimelineDrawable::OnsetComeupTotal(curve))
}

pub fn onset_total(phases: &PhaseSeconds, at: &LinePlacement, _options: &ShapeOptions) -> Option<TimelineDrawable> {
    let (o, t) = (phases.onset?, phases.total?);
    let h = at.height;
    let peak = o + (t - o).max(0.0) / 2.0;
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(o, 0.0, LineStyle::Dotted)
        .to(peak, h, LineStyle::Dotted)
        .to(t, 0.0, LineStyle::Dotted)
        .finish();
    Some(TimelineDrawable::OnsetTotal(curve))
}

pub fn total(phases: &PhaseSeconds, at: &LinePlacement, _options: &ShapeOptions) -> Option<TimelineDrawable> {
    let t = phases.total?;
    let h = at.height;
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(t / 2.0, h, LineStyle::Dotted)
        .to(t, 0.0, LineStyle::Dotted)
        .finish();
    Some(TimelineDrawable::Total(curve))
}

pub fn onset_comeup_peak(
    phases: &PhaseSeconds,
    at: &LinePlacement,
    _options: &ShapeOptions,
) -> Option<TimelineDrawable> {
    let (o, c, p) = (phases.onset?, phases.comeup?, phases.peak?);
    let h = at.height;
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(o, 0.0, LineStyle::Dotted)
        .to(o + c, h, LineStyle::Solid)
        .to(o + c + p, h, LineStyle::Solid)
        .finish();
    Some(TimelineDrawable::OnsetComeupPeak(curve))
}

pub fn onset_comeup(phases: &PhaseSeconds, at: &LinePlacement, _options: &ShapeOptions) -> Option<TimelineDrawable> {
    let (o, c) = (phases.onset?, phases.comeup?);
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(o, 0.0, LineStyle::Dotted)
        .to(o + c, at.height, LineStyle::Solid)
        .finish();
    Some(TimelineDrawable::OnsetComeup(curve))
}

/// Open-ended ramp up to the dose height with a short faded tail
pub fn onset(phases: &PhaseSeconds, at: &LinePlacement, options: &ShapeOptions) -> Option<TimelineDrawable> {
    let o = phases.onset?;
    let tail = o * options.onset_tail_fraction.max(0.0);
    let curve = CurveBuilder::starting_at(at.curve_start())
        .to(o, at.height, LineStyle::Solid)
        .to(o + tail, at.height, LineStyle::Faded)
        .finish();
    Some(TimelineDrawable::Onset(curve))
}
