//! Doseline Core - effect timeline engine
//!
//! Turns ingestion records and substance duration profiles into the
//! geometry of an effect timeline: one lane per substance, curves whose
//! shape follows the available duration data, rating and note markers,
//! and an hour axis. Coordinates are seconds from the chart start and
//! heights normalized to 0..1; mapping them to pixels is up to the renderer.

pub mod axis;
pub mod config;
pub mod document;
pub mod drawable;
pub mod duration;
pub mod error;
pub mod group;
pub mod input;
pub mod line;
pub mod lookup;
pub mod markers;
pub mod model;
pub mod rebuild;

pub use axis::{AxisDrawable, FullHour};
pub use config::TimelineConfig;
pub use document::{load_experience, ExperienceDocument};
pub use drawable::{CurvePoint, CurveSegment, LineStyle, ShapeKind, TimelineDrawable};
pub use duration::{DurationRange, DurationUnit, RoaDuration};
pub use error::{TimelineError, TimelineResult};
pub use group::GroupDrawable;
pub use input::*;
pub use line::WeightedLine;
pub use lookup::{RoaDose, RouteProfile, SubstanceLookup, SubstanceTable};
pub use markers::{RatingDrawable, TimedNoteDrawable};
pub use model::{DisplayFlags, RawTimeline, TimelineInputs, TimelineModel};
pub use rebuild::{RebuildOutcome, TimelineSession};
