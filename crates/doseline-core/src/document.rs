//! Experience documents
//!
//! A self-contained YAML description of one experience: the substance
//! profiles it needs, the ingestions, ratings and notes, and the display
//! toggles. Used by `timeline-inspect` and by tests; a journal host would
//! feed [`TimelineInputs`] from its own storage instead.
//!
//! ```yaml
//! substances:
//!   - name: MDMA
//!     route: oral
//!     duration:
//!       onset: { min: 20, max: 40, units: minutes }
//!       total: { min: 3, max: 5, units: hours }
//!     dose: { units: mg, common_min: 75, strong_min: 140 }
//! ingestions:
//!   - id: 1
//!     substance_name: MDMA
//!     route: oral
//!     time: 2024-03-01T20:00:00Z
//!     dose: 100
//!     units: mg
//!     color: pink
//! flags:
//!   are_redoses_drawn_individually: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::duration::RoaDuration;
use crate::error::{TimelineError, TimelineResult};
use crate::input::{AdministrationRoute, Ingestion, IngestionId, Rating, RatingId, TimedNote};
use crate::lookup::{RoaDose, RouteProfile, SubstanceTable};
use crate::model::{DisplayFlags, TimelineInputs};

/// Profile of one substance for one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceEntry {
    pub name: String,
    pub route: AdministrationRoute,
    #[serde(default)]
    pub duration: Option<RoaDuration>,
    #[serde(default)]
    pub dose: Option<RoaDose>,
}

/// One experience as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceDocument {
    pub substances: Vec<SubstanceEntry>,
    pub ingestions: Vec<Ingestion>,
    pub ratings: Vec<Rating>,
    pub timed_notes: Vec<TimedNote>,
    pub hidden_ingestions: Vec<IngestionId>,
    pub hidden_ratings: Vec<RatingId>,
    pub consumer: Option<String>,
    pub flags: DisplayFlags,
}

impl ExperienceDocument {
    /// Reject malformed duration ranges and doses
    pub fn validate(&self) -> TimelineResult<()> {
        for entry in &self.substances {
            if let Some(duration) = &entry.duration {
                duration
                    .validate()
                    .map_err(|e| e.within(format!("substance '{}' ({})", entry.name, entry.route)))?;
            }
        }
        for ingestion in &self.ingestions {
            if let Some(dose) = ingestion.dose {
                if !dose.is_finite() || dose < 0.0 {
                    return Err(TimelineError::NonFiniteValue {
                        field: "dose".to_string(),
                        value: dose,
                    }
                    .within(format!("ingestion {}", ingestion.id.0)));
                }
            }
        }
        Ok(())
    }

    /// Substance profiles as a lookup table
    pub fn to_table(&self) -> SubstanceTable {
        let mut table = SubstanceTable::new();
        for entry in &self.substances {
            table.insert(
                entry.name.clone(),
                entry.route,
                RouteProfile {
                    duration: entry.duration,
                    dose: entry.dose.clone(),
                },
            );
        }
        table
    }

    /// Records and hidden sets as builder inputs
    pub fn to_inputs(&self) -> TimelineInputs {
        TimelineInputs {
            ingestions: self.ingestions.clone(),
            ratings: self.ratings.clone(),
            timed_notes: self.timed_notes.clone(),
            hidden_ingestions: self.hidden_ingestions.iter().copied().collect(),
            hidden_ratings: self.hidden_ratings.iter().copied().collect(),
            consumer: self.consumer.clone(),
            utc_offset: None,
        }
    }
}

/// Parse an experience document from YAML text
///
/// `origin` only labels errors.
pub fn parse_experience(yaml: &str, origin: &Path) -> TimelineResult<ExperienceDocument> {
    let document: ExperienceDocument = serde_yaml::from_str(yaml).map_err(|source| TimelineError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    document.validate()?;
    Ok(document)
}

/// Read, parse and validate an experience document
pub fn load_experience(path: &Path) -> TimelineResult<ExperienceDocument> {
    let yaml = std::fs::read_to_string(path).map_err(|source| TimelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_experience(&yaml, path)?;
    log::info!(
        "Loaded experience {:?}: {} substances, {} ingestions",
        path,
        document.substances.len(),
        document.ingestions.len()
    );
    Ok(document)
}
