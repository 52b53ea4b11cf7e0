//! The renderable chart
//!
//! Building is two-pass: [`RawTimeline::build`] lays out every lane in
//! non-normalized heights, then [`RawTimeline::normalize`] divides them by
//! the chart-wide maximum. Both passes are pure; the result is a read-only
//! [`TimelineModel`].

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::axis::AxisDrawable;
use crate::config::TimelineConfig;
use crate::group::{DrawingMode, GroupDrawable, LaneKey};
use crate::input::{Ingestion, IngestionId, Rating, RatingId, TimedNote};
use crate::line::WeightedLine;
use crate::lookup::SubstanceLookup;
use crate::markers::{seconds_between, RatingDrawable, TimedNoteDrawable};

/// Everything a chart is built from
#[derive(Debug, Clone, Default)]
pub struct TimelineInputs {
    pub ingestions: Vec<Ingestion>,
    pub ratings: Vec<Rating>,
    pub timed_notes: Vec<TimedNote>,
    pub hidden_ingestions: HashSet<IngestionId>,
    pub hidden_ratings: HashSet<RatingId>,
    /// Whose ingestions to draw; `None` is the journal owner
    pub consumer: Option<String>,
    /// Time zone for axis labels; `None` is UTC
    pub utc_offset: Option<FixedOffset>,
}

impl TimelineInputs {
    /// Other people who dosed during this experience, sorted by name
    pub fn distinct_consumers(&self) -> Vec<String> {
        self.ingestions
            .iter()
            .filter_map(|i| i.consumer_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn visible_ingestions(&self) -> impl Iterator<Item = &Ingestion> {
        self.ingestions
            .iter()
            .filter(|i| !self.hidden_ingestions.contains(&i.id))
            .filter(|i| i.consumer_name == self.consumer)
    }

    fn visible_ratings(&self) -> impl Iterator<Item = &Rating> {
        self.ratings
            .iter()
            .filter(|r| !self.hidden_ratings.contains(&r.id))
    }

    fn visible_notes(&self) -> impl Iterator<Item = &TimedNote> {
        self.timed_notes.iter().filter(|n| n.is_part_of_timeline)
    }
}

/// User toggles affecting the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayFlags {
    pub are_redoses_drawn_individually: bool,
    pub are_substance_heights_independent: bool,
    /// Axis shows hours since start instead of clock time
    pub is_time_relative: bool,
}

impl DisplayFlags {
    pub fn drawing_mode(&self) -> DrawingMode {
        DrawingMode {
            are_redoses_drawn_individually: self.are_redoses_drawn_individually,
            are_substance_heights_independent: self.are_substance_heights_independent,
        }
    }
}

/// First pass: lanes laid out, heights not yet normalized
#[derive(Debug, Clone, PartialEq)]
pub struct RawTimeline {
    pub groups: Vec<GroupDrawable>,
    pub ratings: Vec<RatingDrawable>,
    pub timed_notes: Vec<TimedNoteDrawable>,
    pub start_time: DateTime<Utc>,
    pub total_width: f64,
    pub axis: AxisDrawable,
}

impl RawTimeline {
    /// Lay out the visible inputs
    ///
    /// Returns `None` when nothing is visible, since no start time exists.
    pub fn build(
        inputs: &TimelineInputs,
        lookup: &dyn SubstanceLookup,
        flags: DisplayFlags,
        config: &TimelineConfig,
    ) -> Option<Self> {
        let ingestions: Vec<&Ingestion> = inputs.visible_ingestions().collect();
        let ratings: Vec<&Rating> = inputs.visible_ratings().collect();
        let notes: Vec<&TimedNote> = inputs.visible_notes().collect();

        let start_time = ingestions
            .iter()
            .map(|i| i.time)
            .chain(ratings.iter().map(|r| r.time))
            .chain(notes.iter().map(|n| n.time))
            .min()?;

        let options = config.shape_options();
        let mode = flags.drawing_mode();
        let groups: Vec<GroupDrawable> = group_by_lane(&ingestions)
            .into_iter()
            .map(|(key, members)| {
                let profile = lookup
                    .route_profile(&key.substance_name, key.route)
                    .unwrap_or_default();
                let lines: Vec<WeightedLine> = members
                    .iter()
                    .map(|i| WeightedLine::from_ingestion(i, profile.dose.as_ref()))
                    .collect();
                GroupDrawable::build(start_time, key, profile.duration.as_ref(), &lines, mode, &options)
            })
            .collect();

        let ratings: Vec<RatingDrawable> = ratings
            .iter()
            .map(|r| RatingDrawable::new(r, start_time))
            .collect();
        let timed_notes: Vec<TimedNoteDrawable> = notes
            .iter()
            .map(|n| TimedNoteDrawable::new(n, start_time))
            .collect();

        let latest = groups
            .iter()
            .map(GroupDrawable::end_relative_to_start_in_seconds)
            .chain(ratings.iter().map(|r| r.distance_from_start))
            .chain(timed_notes.iter().map(|n| n.distance_from_start))
            .fold(0.0, f64::max);
        let total_width = (latest + config.trailing_margin_seconds()).max(config.min_width_seconds());

        let offset = inputs.utc_offset.unwrap_or_else(|| Utc.fix());
        let axis = AxisDrawable::new(start_time, total_width, offset, flags.is_time_relative);

        Some(Self {
            groups,
            ratings,
            timed_notes,
            start_time,
            total_width,
            axis,
        })
    }

    /// Tallest lane across the chart
    pub fn max_height(&self) -> f64 {
        self.groups
            .iter()
            .map(GroupDrawable::non_normalized_height)
            .fold(0.0, f64::max)
    }

    /// Second pass: scale every lane against the tallest one
    pub fn normalize(self) -> TimelineModel {
        let max_height = self.max_height();
        let groups: Vec<GroupDrawable> = self.groups.iter().map(|g| g.normalized(max_height)).collect();
        let is_worth_drawing =
            groups.iter().any(|g| g.has_duration_info) || !self.ratings.is_empty() || !self.timed_notes.is_empty();
        TimelineModel {
            groups,
            ratings: self.ratings,
            timed_notes: self.timed_notes,
            start_time: self.start_time,
            total_width: self.total_width,
            axis: self.axis,
            is_worth_drawing,
        }
    }
}

/// A chart ready for painting
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineModel {
    pub groups: Vec<GroupDrawable>,
    pub ratings: Vec<RatingDrawable>,
    pub timed_notes: Vec<TimedNoteDrawable>,
    pub start_time: DateTime<Utc>,
    /// Seconds spanned by the chart
    pub total_width: f64,
    pub axis: AxisDrawable,
    /// False when there is neither a curve nor a marker to show
    pub is_worth_drawing: bool,
}

impl TimelineModel {
    /// Build and normalize in one go
    pub fn build(
        inputs: &TimelineInputs,
        lookup: &dyn SubstanceLookup,
        flags: DisplayFlags,
        config: &TimelineConfig,
    ) -> Option<Self> {
        let raw = RawTimeline::build(inputs, lookup, flags, config)?;
        let model = raw.normalize();
        log::debug!(
            "Built timeline: {} lanes, {} ratings, {} notes, {:.0}s wide",
            model.groups.len(),
            model.ratings.len(),
            model.timed_notes.len(),
            model.total_width
        );
        Some(model)
    }

    /// Where the "now" line goes, in seconds from the chart start
    ///
    /// `None` right after the start and once `now` has left the chart.
    pub fn current_time_offset(&self, now: DateTime<Utc>, config: &TimelineConfig) -> Option<f64> {
        let offset = seconds_between(self.start_time, now);
        (offset > config.current_time_lead_seconds() && offset < self.total_width).then_some(offset)
    }
}

/// Split ingestions into lanes, keeping first-appearance order
fn group_by_lane<'a>(ingestions: &[&'a Ingestion]) -> Vec<(LaneKey, Vec<&'a Ingestion>)> {
    let mut lanes: Vec<(LaneKey, Vec<&'a Ingestion>)> = Vec::new();
    let mut index: HashMap<LaneKey, usize> = HashMap::new();
    for &ingestion in ingestions {
        let key = LaneKey {
            substance_name: ingestion.substance_name.clone(),
            color: ingestion.color,
            route: ingestion.route,
        };
        match index.get(&key) {
            Some(&slot) => lanes[slot].1.push(ingestion),
            None => {
                index.insert(key.clone(), lanes.len());
                lanes.push((key, vec![ingestion]));
            }
        }
    }
    lanes
}
