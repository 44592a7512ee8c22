pub mod coordinator;
pub mod listener;
pub mod state;
pub mod tooltip;

pub use coordinator::InteractionCoordinator;
pub use listener::{ChartListener, ChartSurface, NoopListener};
pub use state::{ChartViewState, HoverSource, InteractionState, NavTicket};
pub use tooltip::{Tooltip, TooltipAnchor, TOOLTIP_FLIP_Y};
