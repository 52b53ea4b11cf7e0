//! Clock subscription for the "now" line

use std::time::Duration;

use chrono::{DateTime, Utc};
use iced::Subscription;

/// Interval between "now" line updates
pub const NOW_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Emits the current time once a minute
///
/// ```ignore
/// fn subscription(&self) -> Subscription<Message> {
///     now_tick().map(Message::Now)
/// }
/// ```
pub fn now_tick() -> Subscription<DateTime<Utc>> {
    iced::time::every(NOW_TICK_INTERVAL).map(|_| Utc::now())
}
