//! iced rendering for doseline effect timelines
//!
//! - **View function**: [`effect_timeline`] turns a `TimelineModel` into an
//!   `Element`, following the iced 0.14 pattern of plain functions over state
//! - **Canvas program**: [`TimelineCanvas`] paints curves, markers and the
//!   hour axis
//! - **Subscription**: [`now_tick`] moves the "now" line without rebuilding
//!   the model

pub mod subscription;
pub mod theme;
pub mod timeline;

pub use subscription::now_tick;
pub use theme::{substance_color, TimelineStyle};
pub use timeline::{effect_timeline, PixelMapper, TimelineCanvas};
