use std::{future::Future, pin::Pin, sync::Arc};

use anyhow::Result;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::chart::NavDirection;
use crate::interaction::{InteractionCoordinator, NavTicket};
use crate::models::ChartDto;

use super::controller::ChartStatus;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

pub type LoadFuture = Pin<Box<dyn Future<Output = Result<ChartDto>> + Send>>;

/// Fetches one week's chart series. The wire protocol behind it belongs to
/// the host.
pub trait WeekLoader: Send + Sync + 'static {
    fn load_week(&self, week_offset: i32) -> LoadFuture;
}

#[derive(Debug)]
pub enum ChartEvent {
    PointerEnter(String),
    PointerLeave,
    PointerMove { x: f64, y: f64 },
    Click(String),
    RowHover(String),
    RowHoverOff,
    LiveMessage(String),
    Navigate(NavDirection),
    NavigateTo(i32),
    /// Container resized or remounted.
    Redraw,
    Status(oneshot::Sender<ChartStatus>),
}

struct LoadResult {
    ticket: NavTicket,
    result: Result<ChartDto>,
}

/// Runs one chart view: every event and every finished load is handled to
/// completion before the next is taken. Returns the coordinator on shutdown.
pub async fn chart_loop(
    mut coordinator: InteractionCoordinator,
    loader: Arc<dyn WeekLoader>,
    mut events: mpsc::UnboundedReceiver<ChartEvent>,
    cancel_token: CancellationToken,
) -> InteractionCoordinator {
    let (load_tx, mut load_rx) = mpsc::unbounded_channel::<LoadResult>();
    let mut in_flight: Option<JoinHandle<()>> = None;

    // Initial page: the week the coordinator is already on.
    if let Some(ticket) = coordinator.navigate_to(coordinator.week_offset()) {
        in_flight = Some(spawn_load(&loader, ticket, load_tx.clone()));
    }

    loop {
        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log_info!("chart loop for view {} shutting down", coordinator.view_id());
                break;
            }
            Some(LoadResult { ticket, result }) = load_rx.recv() => {
                match result {
                    Ok(dto) => {
                        coordinator.complete_navigation(ticket, &dto);
                    }
                    Err(err) => {
                        if coordinator.fail_navigation(ticket) {
                            log_warn!("week {} failed to load: {err:#}", ticket.week_offset);
                        }
                    }
                }
            }
            event = events.recv() => {
                let Some(event) = event else {
                    log_debug!("event channel closed for view {}", coordinator.view_id());
                    break;
                };

                let ticket = match event {
                    ChartEvent::Navigate(direction) => coordinator.request_week(direction),
                    ChartEvent::NavigateTo(week_offset) => coordinator.navigate_to(week_offset),
                    other => {
                        dispatch(&mut coordinator, other);
                        None
                    }
                };

                if let Some(ticket) = ticket {
                    // Only the newest request may commit; stop the older fetch.
                    if let Some(handle) = in_flight.take() {
                        handle.abort();
                    }
                    in_flight = Some(spawn_load(&loader, ticket, load_tx.clone()));
                }
            }
        }
    }

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
    coordinator
}

fn dispatch(coordinator: &mut InteractionCoordinator, event: ChartEvent) {
    match event {
        ChartEvent::PointerEnter(session_id) => {
            coordinator.pointer_enter(&session_id);
        }
        ChartEvent::PointerLeave => coordinator.pointer_leave(),
        ChartEvent::PointerMove { x, y } => {
            coordinator.pointer_move(x, y);
        }
        ChartEvent::Click(session_id) => {
            coordinator.click(&session_id);
        }
        ChartEvent::RowHover(session_id) => {
            coordinator.row_hover(&session_id);
        }
        ChartEvent::RowHoverOff => coordinator.row_hover_off(),
        ChartEvent::LiveMessage(json) => {
            coordinator.handle_live_message(&json);
        }
        ChartEvent::Redraw => {
            if let Err(err) = coordinator.redraw() {
                log_error!("redraw skipped for view {}: {}", coordinator.view_id(), err);
            }
        }
        ChartEvent::Status(reply) => {
            let _ = reply.send(ChartStatus::from_coordinator(coordinator));
        }
        ChartEvent::Navigate(_) | ChartEvent::NavigateTo(_) => {}
    }
}

fn spawn_load(
    loader: &Arc<dyn WeekLoader>,
    ticket: NavTicket,
    load_tx: mpsc::UnboundedSender<LoadResult>,
) -> JoinHandle<()> {
    let fut = loader.load_week(ticket.week_offset);
    tokio::spawn(async move {
        let result = fut.await;
        let _ = load_tx.send(LoadResult { ticket, result });
    })
}
