//! Seams to the host: the companion list view and the chart container.

use uuid::Uuid;

use crate::chart::{MarkerHandle, NavDirection, RenderFrame, Viewport};
use crate::models::TroublePoint;

/// Outbound calls consumed by the companion list/detail view.
pub trait ChartListener {
    fn on_click_graph_point(&mut self, view_id: Uuid, point: &TroublePoint);
    fn on_hover_graph_point(&mut self, view_id: Uuid, point: &TroublePoint);
    fn on_hover_off_graph_point(&mut self, view_id: Uuid);
    fn on_click_nav_week(&mut self, view_id: Uuid, direction: NavDirection);
}

/// The chart container. `viewport` returns `None` while it isn't mounted.
pub trait ChartSurface {
    fn viewport(&self) -> Option<Viewport>;

    /// Replace everything on screen with `frame`.
    fn paint(&mut self, frame: &RenderFrame);

    fn set_marker_highlight(&mut self, _handle: MarkerHandle, _highlighted: bool) {}
}

/// Listener for charts nobody else is watching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl ChartListener for NoopListener {
    fn on_click_graph_point(&mut self, _view_id: Uuid, _point: &TroublePoint) {}
    fn on_hover_graph_point(&mut self, _view_id: Uuid, _point: &TroublePoint) {}
    fn on_hover_off_graph_point(&mut self, _view_id: Uuid) {}
    fn on_click_nav_week(&mut self, _view_id: Uuid, _direction: NavDirection) {}
}
