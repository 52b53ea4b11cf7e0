//! Source records consumed by the timeline builder
//!
//! These mirror what the journal stores for an experience. They are read-only
//! here; the timeline never writes back to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of an ingestion record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestionId(pub u64);

/// Stable identifier of a rating record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingId(pub u64);

/// Route of administration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrationRoute {
    Oral,
    Sublingual,
    Buccal,
    Insufflated,
    Rectal,
    Transdermal,
    Subcutaneous,
    Intramuscular,
    Intravenous,
    Smoked,
    Inhaled,
}

impl AdministrationRoute {
    pub fn name(&self) -> &'static str {
        match self {
            AdministrationRoute::Oral => "oral",
            AdministrationRoute::Sublingual => "sublingual",
            AdministrationRoute::Buccal => "buccal",
            AdministrationRoute::Insufflated => "insufflated",
            AdministrationRoute::Rectal => "rectal",
            AdministrationRoute::Transdermal => "transdermal",
            AdministrationRoute::Subcutaneous => "subcutaneous",
            AdministrationRoute::Intramuscular => "intramuscular",
            AdministrationRoute::Intravenous => "intravenous",
            AdministrationRoute::Smoked => "smoked",
            AdministrationRoute::Inhaled => "inhaled",
        }
    }
}

impl std::fmt::Display for AdministrationRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// How full the stomach was for an oral dose
///
/// A fuller stomach delays absorption, which shifts the whole curve later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StomachFullness {
    Empty,
    HalfFull,
    Full,
    VeryFull,
}

impl StomachFullness {
    pub const fn onset_delay_in_hours(&self) -> f64 {
        match self {
            StomachFullness::Empty => 0.0,
            StomachFullness::HalfFull => 1.5,
            StomachFullness::Full => 3.0,
            StomachFullness::VeryFull => 6.0,
        }
    }
}

/// Fixed palette a substance can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstanceColor {
    Blue,
    Brown,
    Cyan,
    Green,
    Indigo,
    Mint,
    Orange,
    Pink,
    Purple,
    Red,
    Teal,
    Yellow,
}

impl SubstanceColor {
    pub const ALL: [SubstanceColor; 12] = [
        SubstanceColor::Blue,
        SubstanceColor::Brown,
        SubstanceColor::Cyan,
        SubstanceColor::Green,
        SubstanceColor::Indigo,
        SubstanceColor::Mint,
        SubstanceColor::Orange,
        SubstanceColor::Pink,
        SubstanceColor::Purple,
        SubstanceColor::Red,
        SubstanceColor::Teal,
        SubstanceColor::Yellow,
    ];
}

/// One recorded ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingestion {
    pub id: IngestionId,
    pub substance_name: String,
    pub route: AdministrationRoute,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub dose: Option<f64>,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub is_estimate: bool,
    pub color: SubstanceColor,
    /// Companion who took this dose; `None` is the journal owner
    #[serde(default)]
    pub consumer_name: Option<String>,
    #[serde(default)]
    pub stomach_fullness: Option<StomachFullness>,
}

impl Ingestion {
    /// Delay before the onset starts, in hours
    ///
    /// Only oral doses are affected by stomach fullness.
    pub fn onset_delay_in_hours(&self) -> f64 {
        match (self.route, self.stomach_fullness) {
            (AdministrationRoute::Oral, Some(fullness)) => fullness.onset_delay_in_hours(),
            _ => 0.0,
        }
    }
}

/// Shulgin rating scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShulginRatingOption {
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "±")]
    PlusMinus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "++")]
    TwoPlus,
    #[serde(rename = "+++")]
    ThreePlus,
    #[serde(rename = "++++")]
    FourPlus,
}

impl ShulginRatingOption {
    pub fn label(&self) -> &'static str {
        match self {
            ShulginRatingOption::Minus => "-",
            ShulginRatingOption::PlusMinus => "±",
            ShulginRatingOption::Plus => "+",
            ShulginRatingOption::TwoPlus => "++",
            ShulginRatingOption::ThreePlus => "+++",
            ShulginRatingOption::FourPlus => "++++",
        }
    }
}

/// A timed intensity rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub time: DateTime<Utc>,
    pub option: ShulginRatingOption,
}

/// A free-text note pinned to a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedNote {
    pub time: DateTime<Utc>,
    pub color: SubstanceColor,
    #[serde(default = "default_true")]
    pub is_part_of_timeline: bool,
}

fn default_true() -> bool {
    true
}
