//! Effect timeline rendering

mod canvas;
mod geometry;
mod view;

pub use canvas::TimelineCanvas;
pub use geometry::{smooth_controls, PixelMapper};
pub use view::effect_timeline;
