//! Substance profile lookup
//!
//! The substance database lives outside this crate. The timeline only needs
//! the duration profile and the dose thresholds for one substance + route,
//! which it asks for through [`SubstanceLookup`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::duration::RoaDuration;
use crate::input::AdministrationRoute;

/// Dose thresholds for one route
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoaDose {
    pub units: String,
    pub light_min: Option<f64>,
    pub common_min: Option<f64>,
    pub strong_min: Option<f64>,
    pub heavy_min: Option<f64>,
}

impl RoaDose {
    /// Midpoint of the common range, the "common dose" reference
    pub fn average_common_dose(&self) -> Option<f64> {
        let average = (self.common_min? + self.strong_min?) / 2.0;
        (average.is_finite() && average > 0.0).then_some(average)
    }

    fn units_match(&self, units: &str) -> bool {
        self.units.trim().eq_ignore_ascii_case(units.trim())
    }

    /// Dose relative to the common dose (1.0 = common)
    ///
    /// Falls back to 1.0 when the dose, the thresholds or matching units are
    /// missing.
    pub fn strength_relative_to_common_dose(&self, dose: Option<f64>, units: &str) -> f64 {
        let (Some(dose), Some(common)) = (dose, self.average_common_dose()) else {
            return 1.0;
        };
        if !self.units_match(units) || !dose.is_finite() {
            return 1.0;
        }
        (dose / common).max(0.0)
    }

    /// Position of the dose between light and heavy thresholds (0..1)
    ///
    /// Heavier doses sit later within each duration range. Falls back to 0.5.
    pub fn horizontal_weight(&self, dose: Option<f64>, units: &str) -> f64 {
        const DEFAULT_WEIGHT: f64 = 0.5;
        let Some(dose) = dose.filter(|d| d.is_finite()) else {
            return DEFAULT_WEIGHT;
        };
        if !self.units_match(units) {
            return DEFAULT_WEIGHT;
        }
        let (Some(low), Some(high)) = (
            self.light_min.or(self.common_min),
            self.heavy_min.or(self.strong_min),
        ) else {
            return DEFAULT_WEIGHT;
        };
        if high <= low {
            return DEFAULT_WEIGHT;
        }
        ((dose - low) / (high - low)).clamp(0.0, 1.0)
    }
}

/// Everything the timeline needs about one substance + route
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteProfile {
    pub duration: Option<RoaDuration>,
    pub dose: Option<RoaDose>,
}

/// Source of substance profiles
pub trait SubstanceLookup {
    fn route_profile(&self, substance_name: &str, route: AdministrationRoute) -> Option<RouteProfile>;
}

/// In-memory substance table keyed by name and route
#[derive(Debug, Clone, Default)]
pub struct SubstanceTable {
    profiles: HashMap<(String, AdministrationRoute), RouteProfile>,
}

impl SubstanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, substance_name: impl Into<String>, route: AdministrationRoute, profile: RouteProfile) {
        self.profiles.insert((substance_name.into(), route), profile);
    }

    pub fn with(mut self, substance_name: impl Into<String>, route: AdministrationRoute, profile: RouteProfile) -> Self {
        self.insert(substance_name, route, profile);
        self
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl SubstanceLookup for SubstanceTable {
    fn route_profile(&self, substance_name: &str, route: AdministrationRoute) -> Option<RouteProfile> {
        self.profiles.get(&(substance_name.to_string(), route)).cloned()
    }
}
