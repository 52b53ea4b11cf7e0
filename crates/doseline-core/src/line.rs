//! One ingestion's contribution to a timeline lane

use chrono::{DateTime, Utc};

use crate::input::{Ingestion, SubstanceColor};
use crate::lookup::RoaDose;

/// A dose reduced to what the curve math needs
///
/// Built per ingestion at render time, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedLine {
    pub substance_name: String,
    pub start_time: DateTime<Utc>,
    /// Where this dose sits within each duration range (0..1)
    pub horizontal_weight: f64,
    /// Intensity relative to the common dose (vertical weight, >= 0)
    pub strength_relative_to_common_dose: f64,
    pub onset_delay_in_hours: f64,
    pub color: SubstanceColor,
}

impl WeightedLine {
    /// Create a line, clamping weights into their valid domains
    pub fn new(
        substance_name: impl Into<String>,
        start_time: DateTime<Utc>,
        horizontal_weight: f64,
        strength_relative_to_common_dose: f64,
        onset_delay_in_hours: f64,
        color: SubstanceColor,
    ) -> Self {
        Self {
            substance_name: substance_name.into(),
            start_time,
            horizontal_weight: finite_or(horizontal_weight, 0.5).clamp(0.0, 1.0),
            strength_relative_to_common_dose: finite_or(strength_relative_to_common_dose, 1.0).max(0.0),
            onset_delay_in_hours: finite_or(onset_delay_in_hours, 0.0).max(0.0),
            color,
        }
    }

    /// Weigh an ingestion against its route's dose thresholds
    pub fn from_ingestion(ingestion: &Ingestion, dose: Option<&RoaDose>) -> Self {
        let (horizontal, vertical) = match dose {
            Some(roa_dose) => (
                roa_dose.horizontal_weight(ingestion.dose, &ingestion.units),
                roa_dose.strength_relative_to_common_dose(ingestion.dose, &ingestion.units),
            ),
            None => (0.5, 1.0),
        };
        Self::new(
            ingestion.substance_name.clone(),
            ingestion.time,
            horizontal,
            vertical,
            ingestion.onset_delay_in_hours(),
            ingestion.color,
        )
    }

    pub fn onset_delay_in_seconds(&self) -> f64 {
        self.onset_delay_in_hours * 3_600.0
    }

    /// Seconds from `graph_start` to this ingestion
    pub fn seconds_since(&self, graph_start: DateTime<Utc>) -> f64 {
        (self.start_time - graph_start).num_milliseconds() as f64 / 1_000.0
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{AdministrationRoute, IngestionId, StomachFullness};
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_weights_are_sanitized() {
        let line = WeightedLine::new("LSD", start(), 1.7, -2.0, f64::NAN, SubstanceColor::Blue);
        assert_eq!(line.horizontal_weight, 1.0);
        assert_eq!(line.strength_relative_to_common_dose, 0.0);
        assert_eq!(line.onset_delay_in_hours, 0.0);
    }

    #[test]
    fn test_from_ingestion_without_dose_data() {
        let ingestion = Ingestion {
            id: IngestionId(7),
            substance_name: "Caffeine".to_string(),
            route: AdministrationRoute::Oral,
            time: start(),
            dose: Some(80.0),
            units: "mg".to_string(),
            is_estimate: true,
            color: SubstanceColor::Brown,
            consumer_name: None,
            stomach_fullness: Some(StomachFullness::HalfFull),
        };
        let line = WeightedLine::from_ingestion(&ingestion, None);
        assert_eq!(line.horizontal_weight, 0.5);
        assert_eq!(line.strength_relative_to_common_dose, 1.0);
        assert_eq!(line.onset_delay_in_seconds(), 5_400.0);
    }

    #[test]
    fn test_seconds_since() {
        let line = WeightedLine::new("LSD", start() + Duration::minutes(90), 0.5, 1.0, 0.0, SubstanceColor::Blue);
        assert_eq!(line.seconds_since(start()), 5_400.0);
        assert_eq!(line.seconds_since(start() + Duration::hours(2)), -1_800.0);
    }
}
