//! Chart configuration
//!
//! ```ignore
//! use doseline_core::config::{default_config_path, load_config, TimelineConfig};
//!
//! let config: TimelineConfig = load_config(&default_config_path("timeline.yaml"));
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config};
pub use paths::{default_config_dir, default_config_path};

use serde::{Deserialize, Serialize};

use crate::drawable::ShapeOptions;

/// Tunables for building and laying out a chart
///
/// Every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Empty space after the last curve or marker
    pub trailing_margin_minutes: f64,
    /// Lower bound on the chart width
    pub min_width_hours: f64,
    /// The "now" line is hidden this soon after the chart start
    pub current_time_lead_minutes: f64,
    /// Minimum gap between hour labels
    pub min_label_spacing_px: f64,
    /// Faded tail of onset-only curves, as a fraction of the onset
    pub onset_tail_fraction: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            trailing_margin_minutes: 30.0,
            min_width_hours: 1.0,
            current_time_lead_minutes: 2.0,
            min_label_spacing_px: 40.0,
            onset_tail_fraction: 0.25,
        }
    }
}

impl TimelineConfig {
    pub fn trailing_margin_seconds(&self) -> f64 {
        non_negative(self.trailing_margin_minutes) * 60.0
    }

    /// Never below one second so pixel mapping stays finite
    pub fn min_width_seconds(&self) -> f64 {
        (non_negative(self.min_width_hours) * 3_600.0).max(1.0)
    }

    pub fn current_time_lead_seconds(&self) -> f64 {
        non_negative(self.current_time_lead_minutes) * 60.0
    }

    pub fn shape_options(&self) -> ShapeOptions {
        ShapeOptions {
            onset_tail_fraction: non_negative(self.onset_tail_fraction),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
