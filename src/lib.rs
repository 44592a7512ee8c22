//! Control/flow chart engine for team troubleshooting sessions.
//!
//! A week of sessions comes in as padded text rows, gets parsed into
//! `TroublePoint`s, laid out against a 50-minute control limit, and rendered
//! as a list of drawing commands. `InteractionCoordinator` keeps the chart in
//! sync with navigation, hover from the companion list, and live status
//! messages; `ChartSession` drives one coordinator from a tokio task.

pub mod chart;
pub mod error;
pub mod interaction;
pub mod metrics;
pub mod models;
pub mod parsing;
pub mod session;
pub mod settings;
pub mod utils;

pub use chart::{
    classify, ChartLayout, ChartModel, ChartSnapshot, DisplayState, DrawCommand, NavDirection,
    RenderEngine, RenderFrame, StyleClass, Viewport, THRESHOLD_SECONDS,
};
pub use error::ChartError;
pub use interaction::{
    ChartListener, ChartSurface, InteractionCoordinator, InteractionState, Tooltip, TooltipAnchor,
};
pub use metrics::ChartMetrics;
pub use models::{ChartDto, TalkMessage, TroublePoint};
pub use parsing::parse_rows;
pub use session::{ChartEvent, ChartSession, WeekLoader};
pub use settings::{ChartSettings, SettingsStore};
pub use utils::init_logging;
