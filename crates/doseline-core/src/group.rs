//! One timeline lane: all doses of a substance taken the same way
//!
//! A lane picks a single curve shape for all of its doses, the richest one
//! its duration profile supports. When redoses are not drawn individually
//! and the profile is complete, the doses are stacked into one cumulative
//! curve instead.
//!
//! Heights are normalized in a second pass, after every lane of the chart is
//! built, so lanes can be compared against the tallest one.

use chrono::{DateTime, Utc};

use crate::drawable::{
    build_full_cumulative, CurveSegment, DoseMarker, LinePlacement, ShapeKind, ShapeOptions,
    TimelineDrawable, SHAPE_PRIORITY,
};
use crate::duration::RoaDuration;
use crate::input::{AdministrationRoute, SubstanceColor};
use crate::line::WeightedLine;

/// Display toggles that change the geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawingMode {
    pub are_redoses_drawn_individually: bool,
    pub are_substance_heights_independent: bool,
}

/// What identifies a lane: doses sharing all three end up together
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaneKey {
    pub substance_name: String,
    pub color: SubstanceColor,
    pub route: AdministrationRoute,
}

/// A built lane
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDrawable {
    pub substance_name: String,
    pub route: AdministrationRoute,
    pub color: SubstanceColor,
    timeline_drawables: Vec<TimelineDrawable>,
    /// Seconds from chart start to the earliest dose of this lane
    pub start_in_seconds: f64,
    pub has_duration_info: bool,
    are_heights_independent: bool,
    /// What heights are divided by; 1.0 until normalized
    height_divisor: f64,
}

impl GroupDrawable {
    /// Build a lane from its doses
    ///
    /// Never fails: without usable duration data every dose becomes a
    /// [`TimelineDrawable::NoTimeline`] dot.
    pub fn build(
        graph_start: DateTime<Utc>,
        key: LaneKey,
        roa_duration: Option<&RoaDuration>,
        weighted_lines: &[WeightedLine],
        mode: DrawingMode,
        options: &ShapeOptions,
    ) -> Self {
        let LaneKey {
            substance_name,
            color,
            route,
        } = key;
        let start_in_seconds = weighted_lines
            .iter()
            .map(|line| line.seconds_since(graph_start))
            .fold(f64::INFINITY, f64::min);
        let start_in_seconds = if start_in_seconds.is_finite() { start_in_seconds } else { 0.0 };

        let placements: Vec<LinePlacement> = weighted_lines
            .iter()
            .map(|line| LinePlacement {
                ingestion_seconds: line.seconds_since(graph_start),
                onset_delay_seconds: line.onset_delay_in_seconds(),
                weight: line.horizontal_weight,
                height: line.strength_relative_to_common_dose,
            })
            .collect();

        let timeline_drawables = match roa_duration {
            Some(roa) => select_drawables(roa, &placements, mode, options),
            None => no_timelines(&placements),
        };
        let has_duration_info = timeline_drawables.iter().any(TimelineDrawable::is_curve);

        log::debug!(
            "Lane {} ({}): {} doses drawn as {}",
            substance_name,
            route,
            placements.len(),
            timeline_drawables
                .first()
                .map_or(ShapeKind::NoTimeline, TimelineDrawable::kind)
        );

        Self {
            substance_name,
            route,
            color,
            timeline_drawables,
            start_in_seconds,
            has_duration_info,
            are_heights_independent: mode.are_substance_heights_independent,
            height_divisor: 1.0,
        }
    }

    pub fn timeline_drawables(&self) -> &[TimelineDrawable] {
        &self.timeline_drawables
    }

    /// Shape shared by every drawable of the lane
    pub fn shape(&self) -> ShapeKind {
        self.timeline_drawables
            .first()
            .map_or(ShapeKind::NoTimeline, TimelineDrawable::kind)
    }

    /// Tallest drawable before normalization
    ///
    /// Individual redoses are not summed here, the max is taken.
    pub fn non_normalized_height(&self) -> f64 {
        self.timeline_drawables
            .iter()
            .map(TimelineDrawable::non_normalized_height)
            .fold(0.0, f64::max)
    }

    pub fn end_relative_to_start_in_seconds(&self) -> f64 {
        self.timeline_drawables
            .iter()
            .map(TimelineDrawable::end_of_line_relative_to_start_in_seconds)
            .fold(0.0, f64::max)
    }

    /// Copy of this lane normalized against `max_height`
    ///
    /// With independent heights the lane normalizes against its own tallest
    /// point instead. The stored geometry is never rescaled, only the
    /// divisor changes, so repeating the call is a no-op.
    pub fn normalized(&self, max_height: f64) -> Self {
        let target = if self.are_heights_independent {
            self.non_normalized_height()
        } else {
            max_height
        };
        Self {
            height_divisor: safe_divisor(target),
            ..self.clone()
        }
    }

    pub fn height_divisor(&self) -> f64 {
        self.height_divisor
    }

    /// Tallest point after normalization (0..1 once normalized)
    pub fn normalized_height(&self) -> f64 {
        self.non_normalized_height() / self.height_divisor
    }

    /// Segments of every drawable, heights divided by the current divisor
    pub fn normalized_segments(&self) -> Vec<Vec<CurveSegment>> {
        self.timeline_drawables
            .iter()
            .map(|d| d.normalized_segments(self.height_divisor))
            .collect()
    }

    /// Dots for doses without a curve
    pub fn dose_markers(&self) -> impl Iterator<Item = &DoseMarker> {
        self.timeline_drawables.iter().filter_map(|d| match d {
            TimelineDrawable::NoTimeline(marker) => Some(marker),
            _ => None,
        })
    }
}

fn safe_divisor(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

fn no_timelines(placements: &[LinePlacement]) -> Vec<TimelineDrawable> {
    placements
        .iter()
        .map(|at| {
            TimelineDrawable::NoTimeline(DoseMarker {
                seconds: at.ingestion_seconds,
                onset_delay_in_hours: at.onset_delay_seconds / 3_600.0,
            })
        })
        .collect()
}

/// Pick the drawables for a lane
///
/// 1. Redoses stacked and a full profile: one cumulative curve.
/// 2. Otherwise the first entry of [`SHAPE_PRIORITY`] that yields at least
///    one drawable is used for the whole lane.
/// 3. Nothing applies: every dose is a dot.
pub fn select_drawables(
    roa_duration: &RoaDuration,
    placements: &[LinePlacement],
    mode: DrawingMode,
    options: &ShapeOptions,
) -> Vec<TimelineDrawable> {
    if !mode.are_redoses_drawn_individually {
        if let Some(cumulative) = build_full_cumulative(roa_duration, placements, options) {
            return vec![cumulative];
        }
    }

    for builder in SHAPE_PRIORITY.iter() {
        let drawables: Vec<TimelineDrawable> = placements
            .iter()
            .filter_map(|at| (builder.build)(&roa_duration.phases_at(at.weight), at, options))
            .collect();
        if !drawables.is_empty() {
            return drawables;
        }
    }

    no_timelines(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DurationRange;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
    }

    fn line(offset_minutes: i64, strength: f64) -> WeightedLine {
        WeightedLine::new(
            "2C-B",
            start() + Duration::minutes(offset_minutes),
            0.5,
            strength,
            0.0,
            SubstanceColor::Purple,
        )
    }

    fn full_profile() -> RoaDuration {
        RoaDuration {
            onset: Some(DurationRange::minutes(20.0, 40.0)),
            comeup: Some(DurationRange::minutes(15.0, 30.0)),
            peak: Some(DurationRange::hours(2.0, 3.0)),
            offset: Some(DurationRange::hours(1.0, 2.0)),
            total: Some(DurationRange::hours(4.0, 6.0)),
            afterglow: None,
        }
    }

    fn total_only() -> RoaDuration {
        RoaDuration {
            total: Some(DurationRange::hours(4.0, 6.0)),
            ..Default::default()
        }
    }

    fn build(roa: Option<&RoaDuration>, lines: &[WeightedLine], mode: DrawingMode) -> GroupDrawable {
        GroupDrawable::build(
            start(),
            LaneKey {
                substance_name: "2C-B".to_string(),
                color: SubstanceColor::Purple,
                route: AdministrationRoute::Oral,
            },
            roa,
            lines,
            mode,
            &ShapeOptions::default(),
        )
    }

    #[test]
    fn test_missing_profile_yields_dots() {
        let group = build(None, &[line(30, 1.0)], DrawingMode::default());
        assert!(!group.has_duration_info);
        assert_eq!(group.shape(), ShapeKind::NoTimeline);
        assert_eq!(group.start_in_seconds, 1_800.0);
        let markers: Vec<&DoseMarker> = group.dose_markers().collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].seconds, 1_800.0);
    }

    #[test]
    fn test_unusable_profile_yields_dots() {
        let afterglow_only = RoaDuration {
            afterglow: Some(DurationRange::hours(1.0, 2.0)),
            ..Default::default()
        };
        let group = build(Some(&afterglow_only), &[line(0, 1.0), line(60, 1.0)], DrawingMode::default());
        assert!(!group.has_duration_info);
        assert_eq!(group.timeline_drawables().len(), 2);
    }

    #[test]
    fn test_cumulative_when_redoses_stacked() {
        let group = build(Some(&full_profile()), &[line(0, 1.0), line(60, 1.0)], DrawingMode::default());
        assert_eq!(group.shape(), ShapeKind::FullCumulative);
        assert_eq!(group.timeline_drawables().len(), 1);
        assert!(group.non_normalized_height() > 1.0);
    }

    #[test]
    fn test_full_per_dose_when_individual() {
        let mode = DrawingMode {
            are_redoses_drawn_individually: true,
            ..Default::default()
        };
        let group = build(Some(&full_profile()), &[line(0, 1.0), line(60, 1.0)], mode);
        assert_eq!(group.shape(), ShapeKind::Full);
        assert_eq!(group.timeline_drawables().len(), 2);
        assert_eq!(group.non_normalized_height(), 1.0);
    }

    #[test]
    fn test_total_only_redoses_are_not_summed() {
        let mode = DrawingMode {
            are_redoses_drawn_individually: true,
            ..Default::default()
        };
        let group = build(Some(&total_only()), &[line(0, 1.0), line(60, 0.5)], mode);
        assert_eq!(group.shape(), ShapeKind::Total);
        assert_eq!(group.timeline_drawables().len(), 2);
        assert_eq!(group.non_normalized_height(), 1.0);
        // The second dose starts an hour later and lasts 5 hours
        assert_eq!(group.end_relative_to_start_in_seconds(), 6.0 * 3_600.0);
    }

    #[test]
    fn test_partial_profile_falls_back_even_when_stacked() {
        let group = build(Some(&total_only()), &[line(0, 1.0), line(60, 1.0)], DrawingMode::default());
        assert_eq!(group.shape(), ShapeKind::Total);
        assert_eq!(group.timeline_drawables().len(), 2);
    }

    #[test]
    fn test_normalize_against_shared_max() {
        let group = build(Some(&total_only()), &[line(0, 0.5)], DrawingMode::default());
        let normalized = group.normalized(2.0);
        assert_eq!(normalized.normalized_height(), 0.25);
        assert_eq!(normalized.normalized(2.0), normalized);
    }

    #[test]
    fn test_normalize_independent_uses_own_max() {
        let mode = DrawingMode {
            are_substance_heights_independent: true,
            ..Default::default()
        };
        let group = build(Some(&total_only()), &[line(0, 0.5)], mode);
        let normalized = group.normalized(2.0);
        assert_eq!(normalized.normalized_height(), 1.0);
    }

    #[test]
    fn test_normalize_with_zero_max_is_finite() {
        let group = build(Some(&total_only()), &[line(0, 0.0)], DrawingMode::default());
        let normalized = group.normalized(0.0);
        assert_eq!(normalized.height_divisor(), 1.0);
        assert!(normalized
            .normalized_segments()
            .iter()
            .flatten()
            .all(|s| s.to.height.is_finite()));
    }

    #[test]
    fn test_onset_delay_shifts_curve() {
        let delayed = WeightedLine::new("2C-B", start(), 0.5, 1.0, 3.0, SubstanceColor::Purple);
        let group = build(Some(&total_only()), &[delayed], DrawingMode::default());
        let first = group.timeline_drawables()[0].key_points()[0];
        assert_eq!(first.seconds, 3.0 * 3_600.0);
        assert_eq!(group.start_in_seconds, 0.0);
    }
}
