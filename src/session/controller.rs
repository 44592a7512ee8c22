use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::interaction::{InteractionCoordinator, InteractionState};
use crate::metrics::ChartMetrics;

use super::loop_worker::{chart_loop, ChartEvent, WeekLoader};

/// Point-in-time view of a running chart session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStatus {
    pub view_id: Uuid,
    pub week_offset: i32,
    pub interaction: InteractionState,
    pub point_count: usize,
    pub title: Option<String>,
    pub metrics: ChartMetrics,
}

impl ChartStatus {
    pub(crate) fn from_coordinator(coordinator: &mut InteractionCoordinator) -> Self {
        Self {
            view_id: coordinator.view_id(),
            week_offset: coordinator.week_offset(),
            interaction: coordinator.interaction().clone(),
            point_count: coordinator.snapshot().len(),
            title: coordinator.frame().map(|frame| frame.title.clone()),
            metrics: coordinator.metrics().clone(),
        }
    }
}

/// A mounted chart view driven by a single task. Dropping the session
/// unmounts the view.
pub struct ChartSession {
    view_id: Uuid,
    events: mpsc::UnboundedSender<ChartEvent>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<InteractionCoordinator>>,
}

impl ChartSession {
    /// Spawn the loop and request the coordinator's current week. Must be
    /// called from inside a tokio runtime.
    pub fn start(coordinator: InteractionCoordinator, loader: Arc<dyn WeekLoader>) -> Self {
        let view_id = coordinator.view_id();
        let cancel_token = CancellationToken::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(chart_loop(
            coordinator,
            loader,
            events_rx,
            cancel_token.clone(),
        ));

        Self {
            view_id,
            events: events_tx,
            cancel_token,
            handle: Some(handle),
        }
    }

    pub fn view_id(&self) -> Uuid {
        self.view_id
    }

    pub fn send(&self, event: ChartEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| anyhow!("chart session {} is not running", self.view_id))
    }

    pub async fn status(&self) -> Result<ChartStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ChartEvent::Status(reply_tx))?;
        reply_rx
            .await
            .context("chart session stopped before replying")
    }

    /// Unmount: stop the loop and hand back the coordinator.
    pub async fn stop(mut self) -> Result<InteractionCoordinator> {
        self.cancel_token.cancel();
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("chart session already stopped"))?;
        handle.await.context("chart loop task failed to join")
    }
}

impl Drop for ChartSession {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
