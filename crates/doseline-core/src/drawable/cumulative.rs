//! Stacking redoses into one combined curve
//!
//! Each dose is first built as a [`full`](super::shapes::full) curve. The
//! combined height at any time is the sum of the individual heights, which
//! for piecewise-linear curves is exact when evaluated at the union of all
//! key point times. At every knot the sum passes through the left limit,
//! then each curve's vertical steps in turn, then the right limit, so
//! zero-length phases survive the merge.

use super::shapes::{full, LinePlacement, ShapeOptions};
use super::{Curve, CurvePoint, CurveSegment, LineStyle, TimelineDrawable, HEIGHT_EPSILON};
use crate::duration::RoaDuration;

/// Build one summed curve for all doses of a lane
///
/// Returns `None` when the profile lacks any of onset, comeup, peak or
/// offset, or when there are no doses. A single dose reproduces the plain
/// full curve.
pub fn build_full_cumulative(
    roa_duration: &RoaDuration,
    placements: &[LinePlacement],
    options: &ShapeOptions,
) -> Option<TimelineDrawable> {
    let curves: Vec<Curve> = placements
        .iter()
        .map(|at| {
            let phases = roa_duration.phases_at(at.weight);
            full(&phases, at, options).and_then(|d| d.curve().cloned())
        })
        .collect::<Option<Vec<_>>>()?;
    if curves.is_empty() {
        return None;
    }
    Some(TimelineDrawable::FullCumulative(Curve::from_segments(sum_curves(&curves))))
}

/// Appends segments from the last point reached
#[derive(Default)]
struct Tracer {
    cursor: Option<CurvePoint>,
    segments: Vec<CurveSegment>,
}

impl Tracer {
    fn step(&mut self, to: CurvePoint, style: LineStyle) {
        if let Some(from) = self.cursor {
            self.segments.push(CurveSegment { from, to, style });
        }
        self.cursor = Some(to);
    }
}

/// Knot-by-knot sum of curves
fn sum_curves(curves: &[Curve]) -> Vec<CurveSegment> {
    let mut knots: Vec<f64> = curves
        .iter()
        .flat_map(|c| c.key_points().into_iter().map(|p| p.seconds))
        .collect();
    knots.sort_by(f64::total_cmp);
    knots.dedup();

    let mut tracer = Tracer::default();
    let mut previous_knot: Option<f64> = None;
    for &t in &knots {
        let mut levels: Vec<f64> = curves.iter().map(|c| c.height_before(t)).collect();
        let style = previous_knot.map_or(LineStyle::Dotted, |from| interval_style(curves, from, t));
        tracer.step(CurvePoint::new(t, levels.iter().sum()), style);

        for (index, curve) in curves.iter().enumerate() {
            for segment in curve.vertical_steps_at(t) {
                levels[index] = segment.to.height;
                tracer.step(CurvePoint::new(t, levels.iter().sum()), segment.style);
            }
        }

        let reached: f64 = levels.iter().sum();
        let after: f64 = curves.iter().map(|c| c.height_after(t)).sum();
        if (after - reached).abs() > HEIGHT_EPSILON {
            tracer.step(CurvePoint::new(t, after), LineStyle::Solid);
        }
        previous_knot = Some(t);
    }
    tracer.segments
}

/// Solid when any dose is past its onset between two knots, dotted otherwise
///
/// Gaps between disjoint doses count as dotted.
fn interval_style(curves: &[Curve], from: f64, to: f64) -> LineStyle {
    let mid = from + (to - from) / 2.0;
    let any_solid = curves.iter().flat_map(|c| c.segments()).any(|s| {
        s.style == LineStyle::Solid && s.width() > 0.0 && s.from.seconds <= mid && mid < s.to.seconds
    });
    if any_solid {
        LineStyle::Solid
    } else {
        LineStyle::Dotted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::ShapeKind;
    use crate::duration::DurationRange;

    fn profile() -> RoaDuration {
        RoaDuration {
            onset: Some(DurationRange::minutes(30.0, 30.0)),
            comeup: Some(DurationRange::minutes(30.0, 30.0)),
            peak: Some(DurationRange::hours(2.0, 2.0)),
            offset: Some(DurationRange::hours(1.0, 1.0)),
            total: None,
            afterglow: None,
        }
    }

    fn at(ingestion_seconds: f64, height: f64) -> LinePlacement {
        LinePlacement {
            ingestion_seconds,
            onset_delay_seconds: 0.0,
            weight: 0.5,
            height,
        }
    }

    fn all_zero() -> RoaDuration {
        let zero = Some(DurationRange::minutes(0.0, 0.0));
        RoaDuration {
            onset: zero,
            comeup: zero,
            peak: zero,
            offset: zero,
            total: None,
            afterglow: None,
        }
    }

    #[test]
    fn test_single_dose_matches_full() {
        let options = ShapeOptions::default();
        let mut instant_comeup = profile();
        instant_comeup.comeup = Some(DurationRange::minutes(0.0, 0.0));
        for (name, duration, dose) in [
            ("regular", profile(), at(0.0, 1.0)),
            ("instant comeup", instant_comeup, at(0.0, 1.0)),
            ("all zero", all_zero(), at(600.0, 1.0)),
            ("zero height", profile(), at(600.0, 0.0)),
        ] {
            let cumulative = build_full_cumulative(&duration, &[dose], &options).unwrap();
            let single = full(&duration.phases_at(0.5), &dose, &options).unwrap();
            assert_eq!(cumulative.kind(), ShapeKind::FullCumulative, "{name}");
            assert_eq!(cumulative.key_points(), single.key_points(), "{name}");
            assert_eq!(
                cumulative.end_of_line_relative_to_start_in_seconds(),
                single.end_of_line_relative_to_start_in_seconds(),
                "{name}"
            );
            let styles: Vec<LineStyle> = cumulative.curve().unwrap().segments().iter().map(|s| s.style).collect();
            let expected: Vec<LineStyle> = single.curve().unwrap().segments().iter().map(|s| s.style).collect();
            assert_eq!(styles, expected, "{name}");
        }
    }

    #[test]
    fn test_all_zero_dose_keeps_its_spike() {
        let cumulative = build_full_cumulative(&all_zero(), &[at(600.0, 1.0)], &ShapeOptions::default()).unwrap();
        assert_eq!(
            cumulative.key_points(),
            vec![
                CurvePoint::new(600.0, 0.0),
                CurvePoint::new(600.0, 0.0),
                CurvePoint::new(600.0, 1.0),
                CurvePoint::new(600.0, 1.0),
                CurvePoint::new(600.0, 0.0),
            ]
        );
        assert_eq!(cumulative.non_normalized_height(), 1.0);
        assert_eq!(cumulative.end_of_line_relative_to_start_in_seconds(), 600.0);
    }

    #[test]
    fn test_gap_and_second_onset_are_dotted() {
        let doses = [at(0.0, 1.0), at(10.0 * 3_600.0, 1.0)];
        let cumulative = build_full_cumulative(&profile(), &doses, &ShapeOptions::default()).unwrap();
        let style_from = |seconds: f64| {
            cumulative
                .curve()
                .unwrap()
                .segments()
                .iter()
                .find(|s| s.from.seconds == seconds && s.width() > 0.0)
                .map(|s| s.style)
        };
        // First dose ends at 4h, the second one's onset runs 10h to 10.5h
        assert_eq!(style_from(4.0 * 3_600.0), Some(LineStyle::Dotted));
        assert_eq!(style_from(10.0 * 3_600.0), Some(LineStyle::Dotted));
        assert_eq!(style_from(10.5 * 3_600.0), Some(LineStyle::Solid));
        assert_eq!(style_from(3.0 * 3_600.0), Some(LineStyle::Solid));
    }

    #[test]
    fn test_overlapping_doses_stack() {
        let options = ShapeOptions::default();
        let doses = [at(0.0, 1.0), at(3_600.0, 1.0)];
        let cumulative = build_full_cumulative(&profile(), &doses, &options).unwrap();
        // Both plateaus overlap between 2h and 3h after the first dose
        assert!((cumulative.non_normalized_height() - 2.0).abs() < 1e-9);
        assert_eq!(cumulative.end_of_line_relative_to_start_in_seconds(), 3_600.0 + 4.0 * 3_600.0);
    }

    #[test]
    fn test_disjoint_doses_do_not_stack() {
        let options = ShapeOptions::default();
        let doses = [at(0.0, 1.0), at(10.0 * 3_600.0, 0.5)];
        let cumulative = build_full_cumulative(&profile(), &doses, &options).unwrap();
        assert!((cumulative.non_normalized_height() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_requires_full_profile() {
        let mut partial = profile();
        partial.offset = None;
        assert!(build_full_cumulative(&partial, &[at(0.0, 1.0)], &ShapeOptions::default()).is_none());
        assert!(build_full_cumulative(&profile(), &[], &ShapeOptions::default()).is_none());
    }

    #[test]
    fn test_zero_length_comeup_keeps_jump() {
        let mut instant = profile();
        instant.comeup = Some(DurationRange::minutes(0.0, 0.0));
        let cumulative = build_full_cumulative(&instant, &[at(0.0, 1.0)], &ShapeOptions::default()).unwrap();
        let points = cumulative.key_points();
        assert!(points.contains(&CurvePoint::new(1_800.0, 0.0)));
        assert!(points.contains(&CurvePoint::new(1_800.0, 1.0)));
    }
}
