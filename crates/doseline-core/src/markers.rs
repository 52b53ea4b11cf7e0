//! Point-in-time markers drawn on top of the curves

use chrono::{DateTime, Utc};

use crate::input::{Rating, ShulginRatingOption, SubstanceColor, TimedNote};

/// A Shulgin rating placed on the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingDrawable {
    /// Seconds from the chart start
    pub distance_from_start: f64,
    pub option: ShulginRatingOption,
}

impl RatingDrawable {
    pub fn new(rating: &Rating, graph_start: DateTime<Utc>) -> Self {
        Self {
            distance_from_start: seconds_between(graph_start, rating.time),
            option: rating.option,
        }
    }
}

/// A timed note placed on the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedNoteDrawable {
    /// Seconds from the chart start
    pub distance_from_start: f64,
    pub color: SubstanceColor,
}

impl TimedNoteDrawable {
    pub fn new(note: &TimedNote, graph_start: DateTime<Utc>) -> Self {
        Self {
            distance_from_start: seconds_between(graph_start, note.time),
            color: note.color,
        }
    }
}

pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1_000.0
}
