//! Duration profiles for one route of administration
//!
//! A [`RoaDuration`] names the phases of an experience (onset, comeup, peak,
//! offset, total, afterglow). Each phase is an optional [`DurationRange`]
//! because substance databases are frequently incomplete.
//!
//! All math is done in seconds. Range accessors are lenient: non-finite
//! bounds count as missing, negative bounds clamp to zero and an inverted
//! range collapses to its `min`. Use [`RoaDuration::validate`] to reject such
//! data instead.

use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Unit of a duration range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    /// Number of seconds in one unit
    pub const fn seconds_per_unit(&self) -> f64 {
        match self {
            DurationUnit::Seconds => 1.0,
            DurationUnit::Minutes => 60.0,
            DurationUnit::Hours => 3_600.0,
            DurationUnit::Days => 86_400.0,
        }
    }
}

/// A `[min, max]` interval for one phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub units: DurationUnit,
}

impl DurationRange {
    pub const fn new(min: f64, max: f64, units: DurationUnit) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            units,
        }
    }

    pub const fn minutes(min: f64, max: f64) -> Self {
        Self::new(min, max, DurationUnit::Minutes)
    }

    pub const fn hours(min: f64, max: f64) -> Self {
        Self::new(min, max, DurationUnit::Hours)
    }

    fn bound_in_seconds(&self, value: Option<f64>) -> Option<f64> {
        let value = value?;
        if !value.is_finite() {
            return None;
        }
        // A finite bound can still overflow once converted
        let seconds = value.max(0.0) * self.units.seconds_per_unit();
        seconds.is_finite().then_some(seconds)
    }

    /// Sanitized `(min, max)` in seconds
    ///
    /// A single present bound stands in for both. Returns `None` when neither
    /// bound is usable.
    pub fn bounds_in_seconds(&self) -> Option<(f64, f64)> {
        let min = self.bound_in_seconds(self.min);
        let max = self.bound_in_seconds(self.max);
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) => (min, max),
            (Some(only), None) | (None, Some(only)) => (only, only),
            (None, None) => return None,
        };
        if min > max {
            log::warn!(
                "Inverted duration range {:?}..{:?} {:?}, treating as zero-length",
                self.min,
                self.max,
                self.units
            );
            return Some((min, min));
        }
        Some((min, max))
    }

    /// Whether this range carries any usable bound
    pub fn is_usable(&self) -> bool {
        self.bounds_in_seconds().is_some()
    }

    /// Position `weight` (clamped to 0..1) between min and max, in seconds
    ///
    /// Weight 0 yields `min`, weight 1 yields `max`.
    pub fn interpolate_at_value_in_seconds(&self, weight: f64) -> Option<f64> {
        let (min, max) = self.bounds_in_seconds()?;
        let weight = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.5
        };
        Some(min + (max - min) * weight)
    }

    /// Strict check used when loading documents
    pub fn validate(&self, field: &str) -> TimelineResult<()> {
        for value in [self.min, self.max].into_iter().flatten() {
            let seconds = value * self.units.seconds_per_unit();
            if !seconds.is_finite() || value < 0.0 {
                return Err(TimelineError::NonFiniteValue {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(TimelineError::InvalidRange {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Phase durations of a substance for one route of administration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoaDuration {
    pub onset: Option<DurationRange>,
    pub comeup: Option<DurationRange>,
    pub peak: Option<DurationRange>,
    pub offset: Option<DurationRange>,
    pub total: Option<DurationRange>,
    pub afterglow: Option<DurationRange>,
}

/// Interpolated phase lengths for one dose, in seconds
///
/// Missing phases are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseSeconds {
    pub onset: Option<f64>,
    pub comeup: Option<f64>,
    pub peak: Option<f64>,
    pub offset: Option<f64>,
    pub total: Option<f64>,
}

impl RoaDuration {
    /// Whether any phase carries a usable range
    pub fn has_any(&self) -> bool {
        [
            self.onset,
            self.comeup,
            self.peak,
            self.offset,
            self.total,
            self.afterglow,
        ]
        .iter()
        .flatten()
        .any(DurationRange::is_usable)
    }

    /// Phase lengths for a dose placed at `weight` within each range
    pub fn phases_at(&self, weight: f64) -> PhaseSeconds {
        let at = |range: &Option<DurationRange>| {
            range
                .as_ref()
                .and_then(|r| r.interpolate_at_value_in_seconds(weight))
        };
        PhaseSeconds {
            onset: at(&self.onset),
            comeup: at(&self.comeup),
            peak: at(&self.peak),
            offset: at(&self.offset),
            total: at(&self.total),
        }
    }

    /// Strict validation of every present phase
    pub fn validate(&self) -> TimelineResult<()> {
        let fields = [
            ("onset", &self.onset),
            ("comeup", &self.comeup),
            ("peak", &self.peak),
            ("offset", &self.offset),
            ("total", &self.total),
            ("afterglow", &self.afterglow),
        ];
        for (name, range) in fields {
            if let Some(range) = range {
                range.validate(name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(DurationRange::minutes(20.0, 40.0).bounds_in_seconds(), Some((1200.0, 2400.0)));
        assert_eq!(DurationRange::hours(1.0, 2.0).bounds_in_seconds(), Some((3600.0, 7200.0)));
        let days = DurationRange::new(1.0, 1.0, DurationUnit::Days);
        assert_eq!(days.bounds_in_seconds(), Some((86_400.0, 86_400.0)));
    }

    #[test]
    fn test_interpolation_endpoints() {
        let range = DurationRange::minutes(20.0, 40.0);
        assert_eq!(range.interpolate_at_value_in_seconds(0.0), Some(1200.0));
        assert_eq!(range.interpolate_at_value_in_seconds(1.0), Some(2400.0));
        assert_eq!(range.interpolate_at_value_in_seconds(0.5), Some(1800.0));
    }

    #[test]
    fn test_weight_is_clamped() {
        let range = DurationRange::minutes(20.0, 40.0);
        assert_eq!(range.interpolate_at_value_in_seconds(-3.0), Some(1200.0));
        assert_eq!(range.interpolate_at_value_in_seconds(7.0), Some(2400.0));
        assert_eq!(range.interpolate_at_value_in_seconds(f64::NAN), Some(1800.0));
    }

    #[test]
    fn test_single_bound_stands_in_for_both() {
        let range = DurationRange {
            min: None,
            max: Some(2.0),
            units: DurationUnit::Hours,
        };
        assert_eq!(range.interpolate_at_value_in_seconds(0.0), Some(7200.0));
        assert_eq!(range.interpolate_at_value_in_seconds(1.0), Some(7200.0));
    }

    #[test]
    fn test_defensive_ranges() {
        let inverted = DurationRange::hours(3.0, 2.0);
        assert_eq!(inverted.bounds_in_seconds(), Some((10_800.0, 10_800.0)));

        let negative = DurationRange::minutes(-10.0, 10.0);
        assert_eq!(negative.bounds_in_seconds(), Some((0.0, 600.0)));

        let nan = DurationRange {
            min: Some(f64::NAN),
            max: Some(f64::INFINITY),
            units: DurationUnit::Minutes,
        };
        assert!(!nan.is_usable());
        assert_eq!(nan.interpolate_at_value_in_seconds(0.5), None);
    }

    #[test]
    fn test_overflowing_bound_counts_as_missing() {
        let huge = DurationRange::new(1e300, 1e306, DurationUnit::Days);
        let (min, max) = huge.bounds_in_seconds().unwrap();
        assert_eq!(min, 1e300 * 86_400.0);
        assert_eq!(max, min);
        assert!(huge.interpolate_at_value_in_seconds(1.0).unwrap().is_finite());

        let both = DurationRange::new(1e306, 1e307, DurationUnit::Days);
        assert!(!both.is_usable());

        assert!(matches!(
            huge.validate("total"),
            Err(TimelineError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn test_zero_length_range() {
        let zero = DurationRange::minutes(0.0, 0.0);
        assert!(zero.is_usable());
        assert_eq!(zero.interpolate_at_value_in_seconds(0.3), Some(0.0));
    }

    #[test]
    fn test_validate() {
        assert!(DurationRange::hours(1.0, 2.0).validate("peak").is_ok());
        assert!(matches!(
            DurationRange::hours(3.0, 2.0).validate("peak"),
            Err(TimelineError::InvalidRange { .. })
        ));
        assert!(matches!(
            DurationRange::hours(-1.0, 2.0).validate("onset"),
            Err(TimelineError::NonFiniteValue { .. })
        ));

        let roa = RoaDuration {
            total: Some(DurationRange::hours(6.0, 4.0)),
            ..Default::default()
        };
        assert!(roa.validate().is_err());
    }

    #[test]
    fn test_phases_at() {
        let roa = RoaDuration {
            onset: Some(DurationRange::minutes(20.0, 40.0)),
            comeup: Some(DurationRange::minutes(60.0, 120.0)),
            ..Default::default()
        };
        let phases = roa.phases_at(0.5);
        assert_eq!(phases.onset, Some(1800.0));
        assert_eq!(phases.comeup, Some(5400.0));
        assert_eq!(phases.peak, None);
        assert!(roa.has_any());
        assert!(!RoaDuration::default().has_any());
    }
}
