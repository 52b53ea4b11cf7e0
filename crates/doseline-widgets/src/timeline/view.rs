//! Timeline view function
//!
//! ```ignore
//! fn view(&self) -> Element<Message> {
//!     match &self.timeline {
//!         Some(model) => effect_timeline(model, self.now, &self.config, TimelineStyle::default()),
//!         None => text("No ingestions").into(),
//!     }
//! }
//! ```

use chrono::{DateTime, Utc};
use doseline_core::{TimelineConfig, TimelineModel};
use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::TimelineCanvas;
use crate::theme::TimelineStyle;

/// Chart of `model` with the "now" line placed at `now`
///
/// The model is not rebuilt here, so redrawing on every clock tick is cheap.
pub fn effect_timeline<'a, Message>(
    model: &'a TimelineModel,
    now: DateTime<Utc>,
    config: &TimelineConfig,
    style: TimelineStyle,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let current_time = model.current_time_offset(now, config);
    let style = TimelineStyle {
        min_label_spacing_px: config.min_label_spacing_px as f32,
        ..style
    };
    Canvas::new(TimelineCanvas {
        model,
        current_time,
        style,
    })
    .width(Length::Fill)
    .height(Length::Fixed(style.total_height()))
    .into()
}
