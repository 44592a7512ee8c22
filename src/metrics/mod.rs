mod types;

pub use types::{ChartMetrics, StateCounts};

use crate::chart::{classify, ChartSnapshot, ControlZone, DisplayState};

/// Summary statistics over a snapshot, cached by model revision so repeated
/// reads between mutations don't rescan the points.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    cached: Option<ChartMetrics>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics_for(&mut self, snapshot: &ChartSnapshot) -> &ChartMetrics {
        let stale = self
            .cached
            .as_ref()
            .map_or(true, |metrics| metrics.revision != snapshot.revision);
        if stale {
            self.cached = Some(aggregate(snapshot));
        }
        self.cached.get_or_insert_with(|| aggregate(snapshot))
    }
}

pub fn aggregate(snapshot: &ChartSnapshot) -> ChartMetrics {
    let mut metrics = ChartMetrics {
        revision: snapshot.revision,
        ..ChartMetrics::default()
    };
    let mut closed_count = 0usize;

    for point in snapshot.iter() {
        let classification = classify(point);
        metrics.total_count += 1;
        metrics.total_duration_secs = metrics
            .total_duration_secs
            .saturating_add(point.duration_seconds);
        metrics.max_duration_secs = metrics.max_duration_secs.max(point.duration_seconds);

        if classification.zone == ControlZone::OutOfControl {
            metrics.out_of_control_count += 1;
        }
        if point.has_retro() {
            metrics.retro_count += 1;
        }
        if point.is_closed() {
            closed_count += 1;
        }

        let states = &mut metrics.states;
        match classification.display_state {
            DisplayState::NeedsReview => states.needs_review += 1,
            DisplayState::RetroInProgress => states.retro_in_progress += 1,
            DisplayState::Reviewed => states.reviewed += 1,
            DisplayState::Closed => states.closed += 1,
            DisplayState::Solved => states.solved += 1,
        }
    }

    if metrics.total_count > 0 {
        let total = metrics.total_count as f64;
        metrics.out_of_control_ratio = metrics.out_of_control_count as f64 / total;
        metrics.closed_ratio = closed_count as f64 / total;
        metrics.average_duration_secs = metrics.total_duration_secs as f64 / total;
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartModel, StatusUpdate};
    use crate::models::session::test_point;
    use crate::models::{SessionStamp, SessionStatus};

    #[test]
    fn empty_chart_has_zero_ratios() {
        let metrics = aggregate(&ChartSnapshot::default());
        assert_eq!(metrics.total_count, 0);
        assert_eq!(metrics.out_of_control_ratio, 0.0);
        assert_eq!(metrics.average_duration_secs, 0.0);
    }

    #[test]
    fn counts_states_and_durations() {
        let mut model = ChartModel::new();
        let mut retro = test_point("retro", 600);
        retro.retro_time = SessionStamp::parse("2026-03-02 10:00:00");
        let mut closed = test_point("closed", 3600);
        closed.status = SessionStatus::Closed;
        model.load(vec![
            test_point("long", 3000),
            retro,
            closed,
            test_point("short", 600),
        ]);

        let metrics = aggregate(&model.snapshot());
        assert_eq!(metrics.total_count, 4);
        assert_eq!(metrics.out_of_control_count, 2);
        assert_eq!(metrics.out_of_control_ratio, 0.5);
        assert_eq!(metrics.closed_ratio, 0.25);
        assert_eq!(metrics.retro_count, 1);
        assert_eq!(metrics.max_duration_secs, 3600);
        assert_eq!(metrics.total_duration_secs, 7800);
        assert_eq!(metrics.average_duration_secs, 1950.0);
        assert_eq!(
            metrics.states,
            StateCounts {
                needs_review: 1,
                retro_in_progress: 1,
                reviewed: 0,
                closed: 1,
                solved: 1,
            }
        );
    }

    #[test]
    fn recomputes_only_after_model_changes() {
        let mut model = ChartModel::new();
        model.load(vec![test_point("a", 3100)]);
        let mut aggregator = MetricsAggregator::new();

        assert_eq!(aggregator.metrics_for(&model.snapshot()).states.needs_review, 1);

        model.apply_status_update(
            "a",
            &StatusUpdate {
                status: Some(SessionStatus::Closed),
                ..Default::default()
            },
        );
        let metrics = aggregator.metrics_for(&model.snapshot());
        assert_eq!(metrics.states.needs_review, 0);
        assert_eq!(metrics.states.closed, 1);
        assert_eq!(metrics.revision, model.revision());
    }
}
