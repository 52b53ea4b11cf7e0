//! Hour labels for the time axis
//!
//! Labels sit on full clock hours of the viewer's time zone. In relative mode
//! they sit on full hours since the chart start and read `+1h`, `+2h`, ...
//! The step between labels grows (1, 2, 3, 4, 6, 8, 12, 24 hours) until two
//! neighbours are at least `min_label_spacing_px` apart.

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};

/// Candidate label steps in hours
const HOUR_STEPS: [i64; 8] = [1, 2, 3, 4, 6, 8, 12, 24];

/// Widest label step, for charts spanning centuries
const MAX_STEP_DAYS: f64 = 36_525.0;

/// Rounding slack when testing whether a label fits on the canvas
const PIXEL_TOLERANCE: f64 = 1e-6;

/// One label on the axis
#[derive(Debug, Clone, PartialEq)]
pub struct FullHour {
    /// Pixels from the left edge of the chart
    pub distance_from_start: f64,
    pub label: String,
}

/// The time axis of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDrawable {
    pub start_time: DateTime<Utc>,
    pub width_in_seconds: f64,
    /// Offset used to find clock hours and format them
    pub offset: FixedOffset,
    pub is_time_relative: bool,
}

impl AxisDrawable {
    pub fn new(start_time: DateTime<Utc>, width_in_seconds: f64, offset: FixedOffset, is_time_relative: bool) -> Self {
        Self {
            start_time,
            width_in_seconds,
            offset,
            is_time_relative,
        }
    }

    /// Labels for a chart `width_in_pixels` wide
    ///
    /// Labels that would fall outside the canvas or closer than
    /// `min_label_spacing_px` to the previous one are skipped.
    pub fn get_full_hours(&self, pixels_per_sec: f64, width_in_pixels: f64, min_label_spacing_px: f64) -> Vec<FullHour> {
        if !(pixels_per_sec.is_finite() && pixels_per_sec > 0.0 && width_in_pixels.is_finite() && width_in_pixels > 0.0) {
            return Vec::new();
        }
        let spacing = if min_label_spacing_px.is_finite() {
            min_label_spacing_px.max(0.0)
        } else {
            0.0
        };
        let Some(step_hours) = label_step_hours(pixels_per_sec, spacing) else {
            log::debug!("Chart of {:.0}s too wide for hour labels", self.width_in_seconds);
            return Vec::new();
        };
        let last_seconds = self.width_in_seconds.min((width_in_pixels + PIXEL_TOLERANCE) / pixels_per_sec);

        let mut labels = Vec::new();
        let mut last_x: Option<f64> = None;
        let mut push = |seconds: f64, label: String| {
            let x = seconds * pixels_per_sec;
            if x < 0.0 || x > width_in_pixels + PIXEL_TOLERANCE {
                return;
            }
            if last_x.is_some_and(|last| x - last + PIXEL_TOLERANCE < spacing) {
                return;
            }
            last_x = Some(x);
            labels.push(FullHour {
                distance_from_start: x,
                label,
            });
        };

        if self.is_time_relative {
            let mut hours = step_hours;
            while (hours * 3_600) as f64 <= last_seconds {
                push((hours * 3_600) as f64, format!("+{hours}h"));
                hours += step_hours;
            }
        } else {
            let Some(mut hour) = first_full_hour(self.start_time.with_timezone(&self.offset), step_hours) else {
                return Vec::new();
            };
            let start = self.start_time.with_timezone(&self.offset);
            loop {
                let seconds = (hour - start).num_seconds() as f64;
                if seconds > last_seconds {
                    break;
                }
                push(seconds, hour.format("%H").to_string());
                match hour.checked_add_signed(Duration::hours(step_hours)) {
                    Some(next) => hour = next,
                    None => break,
                }
            }
        }
        labels
    }
}

/// Smallest step whose labels are at least `spacing` pixels apart
///
/// Past a day the step grows in whole days. `None` when even
/// [`MAX_STEP_DAYS`] is too tight for the chart.
fn label_step_hours(pixels_per_sec: f64, spacing: f64) -> Option<i64> {
    // Sub-pixel spacing would put several labels on one pixel
    let spacing = spacing.max(1.0);
    if let Some(hours) = HOUR_STEPS
        .iter()
        .copied()
        .find(|hours| (*hours * 3_600) as f64 * pixels_per_sec >= spacing)
    {
        return Some(hours);
    }
    let days = (spacing / (86_400.0 * pixels_per_sec)).ceil().max(1.0);
    (days <= MAX_STEP_DAYS).then(|| days as i64 * 24)
}

/// First full hour at or after `start` that is a multiple of `step_hours`
fn first_full_hour(start: DateTime<FixedOffset>, step_hours: i64) -> Option<DateTime<FixedOffset>> {
    let truncated = start.with_minute(0)?.with_second(0)?.with_nanosecond(0)?;
    let mut hour = if truncated < start {
        truncated + Duration::hours(1)
    } else {
        truncated
    };
    while i64::from(hour.hour()) % step_hours != 0 {
        hour += Duration::hours(1);
    }
    Some(hour)
}
