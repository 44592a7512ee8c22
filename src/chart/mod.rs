pub mod classifier;
pub mod model;
pub mod render;
pub mod scaler;
pub mod title;

pub use classifier::{
    classify, Classification, ControlZone, DisplayState, StyleClass, THRESHOLD_SECONDS,
};
pub use model::{ChartModel, ChartSnapshot, StatusUpdate};
pub use render::{
    DrawCommand, MarkerHandle, MarkerShape, NavDirection, RenderContext, RenderEngine,
    RenderFrame,
};
pub use scaler::{offset_for, ChartLayout, Viewport};
pub use title::week_title;
