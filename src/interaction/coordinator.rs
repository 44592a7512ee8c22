use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::chart::{
    ChartModel, ChartSnapshot, NavDirection, RenderContext, RenderEngine, RenderFrame,
    StatusUpdate,
};
use crate::error::ChartError;
use crate::metrics::{ChartMetrics, MetricsAggregator};
use crate::models::{ChartDto, CircuitStatusUpdate, SessionStamp, SessionStatus, TalkMessage};
use crate::parsing::parse_rows;
use crate::settings::ChartSettings;

use super::listener::{ChartListener, ChartSurface};
use super::state::{ChartViewState, HoverSource, InteractionState, NavTicket};
use super::tooltip::{place_tooltip, Tooltip};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Owns one chart view's model and decides, per event, whether to mutate the
/// model, redraw, patch a marker, or notify the companion list.
///
/// Every method runs to completion; callers must serialize events (the
/// async `ChartSession` does this).
pub struct InteractionCoordinator {
    view_id: Uuid,
    settings: ChartSettings,
    model: ChartModel,
    view: ChartViewState,
    frame: Option<RenderFrame>,
    metrics: MetricsAggregator,
    listener: Box<dyn ChartListener + Send>,
    surface: Box<dyn ChartSurface + Send>,
    today: Option<NaiveDate>,
}

impl InteractionCoordinator {
    pub fn new(
        settings: ChartSettings,
        listener: Box<dyn ChartListener + Send>,
        surface: Box<dyn ChartSurface + Send>,
    ) -> Self {
        let view_id = Uuid::new_v4();
        log_debug!("chart view {} created", view_id);

        Self {
            view_id,
            settings,
            model: ChartModel::new(),
            view: ChartViewState::new(),
            frame: None,
            metrics: MetricsAggregator::new(),
            listener,
            surface,
            today: None,
        }
    }

    /// Pin the date used for week titles instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn view_id(&self) -> Uuid {
        self.view_id
    }

    pub fn week_offset(&self) -> i32 {
        self.view.week_offset
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.view.interaction
    }

    pub fn view_state(&self) -> &ChartViewState {
        &self.view
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        self.model.snapshot()
    }

    pub fn frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }

    pub fn metrics(&mut self) -> &ChartMetrics {
        let snapshot = self.model.snapshot();
        self.metrics.metrics_for(&snapshot)
    }

    // ---- navigation ----

    /// The user clicked Previous/Next. Relative to the week being loaded if
    /// a load is already in flight, otherwise to the week on screen.
    pub fn request_week(&mut self, direction: NavDirection) -> Option<NavTicket> {
        let base = match self.view.interaction {
            InteractionState::Navigating { target_week } => target_week,
            _ => self.view.week_offset,
        };
        let ticket = self.navigate_to(base + direction.delta())?;
        self.listener.on_click_nav_week(self.view_id, direction);
        Some(ticket)
    }

    /// Start loading `week_offset`. A hover in progress ends here: its
    /// highlight is cleared and a pointer hover reports hover-off.
    pub fn navigate_to(&mut self, week_offset: i32) -> Option<NavTicket> {
        let interrupted = self.view.interaction.hover_source();
        let Some(ticket) = self.view.begin_navigation(week_offset) else {
            log_debug!("view {}: refusing to navigate to future week {}", self.view_id, week_offset);
            return None;
        };
        if interrupted.is_some() {
            self.move_highlight(None);
        }
        if interrupted == Some(HoverSource::Pointer) {
            self.listener.on_hover_off_graph_point(self.view_id);
        }
        log_debug!(
            "view {}: navigating to week {} (generation {})",
            self.view_id,
            week_offset,
            ticket.generation
        );
        Some(ticket)
    }

    /// Commit a loaded week. A ticket superseded by a newer request is
    /// discarded and returns `false`.
    pub fn complete_navigation(&mut self, ticket: NavTicket, dto: &ChartDto) -> bool {
        if !self.view.finish_navigation(&ticket) {
            log_debug!(
                "view {}: discarding stale load for week {} (generation {})",
                self.view_id,
                ticket.week_offset,
                ticket.generation
            );
            return false;
        }

        let report = parse_rows(&dto.chart_series.rows_of_padded_cells);
        if !report.warnings.is_empty() {
            log_warn!(
                "view {}: week {} loaded with {} bad rows",
                self.view_id,
                ticket.week_offset,
                report.warnings.len()
            );
        }

        self.model.load(report.points);
        self.model.set_highlighted(None);
        log_info!(
            "view {}: committed week {} with {} points",
            self.view_id,
            ticket.week_offset,
            self.model.len()
        );

        self.refresh();
        true
    }

    pub fn fail_navigation(&mut self, ticket: NavTicket) -> bool {
        let current = self.view.abandon_navigation(&ticket);
        if current {
            log_debug!(
                "view {}: load for week {} failed; staying on week {}",
                self.view_id,
                ticket.week_offset,
                self.view.week_offset
            );
        }
        current
    }

    /// Reload the week already on screen, superseding any load in flight.
    pub fn load(&mut self, dto: &ChartDto) -> bool {
        match self.navigate_to(self.view.week_offset) {
            Some(ticket) => self.complete_navigation(ticket, dto),
            None => false,
        }
    }

    // ---- hover / click ----

    /// Pointer entered a point's hit target. Ignored while the companion list
    /// is driving the highlight or a week is loading.
    pub fn pointer_enter(&mut self, session_id: &str) -> Option<Tooltip> {
        match &self.view.interaction {
            InteractionState::Navigating { .. } => return None,
            InteractionState::Hovering {
                source: HoverSource::External,
                ..
            } => return None,
            _ => {}
        }
        let point = self.model.get(session_id)?.clone();

        self.view.interaction = InteractionState::Hovering {
            session_id: point.session_id.clone(),
            source: HoverSource::Pointer,
        };
        self.move_highlight(Some(session_id));
        self.listener.on_hover_graph_point(self.view_id, &point);

        self.tooltip(session_id)
    }

    pub fn pointer_leave(&mut self) {
        if self.view.interaction.hover_source() != Some(HoverSource::Pointer) {
            return;
        }
        self.view.interaction = InteractionState::Idle;
        self.move_highlight(None);
        self.listener.on_hover_off_graph_point(self.view_id);
    }

    /// Pointer moved to chart coordinates `(x, y)`; resolves enter/leave
    /// through the frame's hit targets.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Tooltip> {
        let hit = self
            .frame
            .as_ref()
            .and_then(|frame| frame.hit_test(x, y))
            .map(str::to_string);

        let same_point = matches!(
            &self.view.interaction,
            InteractionState::Hovering { session_id, source: HoverSource::Pointer }
                if hit.as_deref() == Some(session_id.as_str())
        );

        match hit {
            Some(id) if same_point => self.tooltip(&id),
            Some(id) => self.pointer_enter(&id),
            None => {
                self.pointer_leave();
                None
            }
        }
    }

    pub fn click(&mut self, session_id: &str) -> bool {
        let Some(point) = self.model.get(session_id).cloned() else {
            return false;
        };

        if let (Some(previous), Some(frame)) =
            (self.model.selected_session_id().map(str::to_string), self.frame.as_mut())
        {
            frame.set_selected(&previous, false);
        }
        self.model.set_selected(Some(session_id));
        if let Some(frame) = self.frame.as_mut() {
            frame.set_selected(session_id, true);
            self.surface.paint(frame);
        }

        self.listener.on_click_graph_point(self.view_id, &point);
        true
    }

    /// The companion list is hovering a row. A known session takes the
    /// highlight even from a pointer hover.
    pub fn row_hover(&mut self, session_id: &str) -> bool {
        if self.view.interaction.is_navigating() || !self.model.contains(session_id) {
            return false;
        }

        self.view.interaction = InteractionState::Hovering {
            session_id: session_id.to_string(),
            source: HoverSource::External,
        };
        self.move_highlight(Some(session_id));
        true
    }

    pub fn row_hover_off(&mut self) {
        if self.view.interaction.hover_source() != Some(HoverSource::External) {
            return;
        }
        self.view.interaction = InteractionState::Idle;
        self.move_highlight(None);
    }

    pub fn tooltip(&self, session_id: &str) -> Option<Tooltip> {
        self.model
            .get(session_id)
            .map(|point| place_tooltip(point, &self.settings.layout))
    }

    // ---- live updates ----

    /// Handle a raw talk-channel message. Anything that isn't a status update
    /// for a session on this chart is dropped.
    pub fn handle_live_message(&mut self, json: &str) -> bool {
        let update = match TalkMessage::from_json(json).and_then(|message| message.status_update()) {
            Ok(Some(update)) => update,
            Ok(None) => return false,
            Err(err) => {
                log_warn!("view {}: dropping talk message: {err:#}", self.view_id);
                return false;
            }
        };
        self.apply_circuit_update(&update)
    }

    pub fn apply_circuit_update(&mut self, update: &CircuitStatusUpdate) -> bool {
        let circuit = &update.learning_circuit_dto;
        let status_update = StatusUpdate {
            status: circuit.status.as_deref().map(SessionStatus::from_token),
            is_marked: None,
            retro_time: circuit
                .retro_started_time
                .as_deref()
                .and_then(SessionStamp::parse),
        };

        if !self.model.apply_status_update(&circuit.session_id, &status_update) {
            return false;
        }

        if let (Some(marks), Some(member_id)) =
            (&circuit.member_marks_for_close, &self.settings.member_id)
        {
            self.model
                .apply_mark_for_member(&circuit.session_id, member_id, marks);
        }

        self.refresh();
        true
    }

    // ---- drawing ----

    /// Lay out and render the whole chart, replacing the previous frame.
    pub fn redraw(&mut self) -> Result<(), ChartError> {
        let viewport = self
            .surface
            .viewport()
            .ok_or(ChartError::RenderPrecondition)?;

        let layout = self.settings.layout.fit(viewport);
        self.model.layout(&layout);

        let ctx = RenderContext {
            layout,
            week_offset: self.view.week_offset,
            today: self.today.unwrap_or_else(|| Local::now().date_naive()),
            week_start: self.settings.week_start,
        };
        let frame = RenderEngine::render(&self.model.snapshot(), &ctx);
        self.surface.paint(&frame);
        self.frame = Some(frame);
        Ok(())
    }

    fn refresh(&mut self) {
        if let Err(err) = self.redraw() {
            log_error!("view {}: skipped render pass: {}", self.view_id, err);
        }
    }

    fn move_highlight(&mut self, next: Option<&str>) {
        if let Some(previous) = self.model.highlighted_session_id().map(str::to_string) {
            self.patch_highlight(&previous, false);
        }
        self.model.set_highlighted(next);
        if let Some(id) = next {
            self.patch_highlight(id, true);
        }
    }

    fn patch_highlight(&mut self, session_id: &str, on: bool) {
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        if let Some(handle) = frame.set_highlight(session_id, on) {
            self.surface.set_marker_highlight(handle, on);
        }
    }

    /// Tear down the view. The model goes with it.
    pub fn unmount(self) {
        log_info!("chart view {} unmounted", self.view_id);
    }
}
