use std::sync::Arc;

use crate::models::{SessionStamp, SessionStatus, TroublePoint};

use super::scaler::ChartLayout;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Fields a live update may merge into an existing point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusUpdate {
    pub status: Option<SessionStatus>,
    pub is_marked: Option<bool>,
    pub retro_time: Option<SessionStamp>,
}

/// Read-only view handed to rendering and metrics. Points are shared
/// `Arc`s, so a point that was not touched by a mutation keeps pointer
/// identity across snapshots.
#[derive(Debug, Clone, Default)]
pub struct ChartSnapshot {
    pub points: Vec<Arc<TroublePoint>>,
    pub highlighted_session_id: Option<String>,
    pub selected_session_id: Option<String>,
    pub revision: u64,
}

impl ChartSnapshot {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, session_id: &str) -> Option<&TroublePoint> {
        self.points
            .iter()
            .find(|point| point.session_id == session_id)
            .map(|point| point.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TroublePoint> {
        self.points.iter().map(|point| point.as_ref())
    }
}

/// Ordered points for one week of one chart view.
#[derive(Debug, Default)]
pub struct ChartModel {
    points: Vec<Arc<TroublePoint>>,
    highlighted_session_id: Option<String>,
    selected_session_id: Option<String>,
    /// Bumped on every data change (load, merge, mark), not on highlight.
    revision: u64,
}

impl ChartModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every point. Highlight and selection survive only if their
    /// session is still present.
    pub fn load(&mut self, points: Vec<TroublePoint>) {
        let count = points.len();
        self.points = points
            .into_iter()
            .enumerate()
            .map(|(index, mut point)| {
                point.index = index;
                point.previous_index = index.checked_sub(1);
                Arc::new(point)
            })
            .collect();

        if let Some(id) = self.highlighted_session_id.take() {
            if self.contains(&id) {
                self.highlighted_session_id = Some(id);
            }
        }
        if let Some(id) = self.selected_session_id.take() {
            if self.contains(&id) {
                self.selected_session_id = Some(id);
            }
        }

        self.revision += 1;
        log_info!("chart model loaded with {} points (revision {})", count, self.revision);
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.position(session_id).is_some()
    }

    pub fn get(&self, session_id: &str) -> Option<&TroublePoint> {
        self.position(session_id).map(|pos| self.points[pos].as_ref())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge live fields into the point with `session_id`. Returns `false`
    /// (and changes nothing) when the session isn't on this chart.
    pub fn apply_status_update(&mut self, session_id: &str, update: &StatusUpdate) -> bool {
        let Some(pos) = self.position(session_id) else {
            log_debug!("status update for {} ignored: not in this week", session_id);
            return false;
        };

        let point = Arc::make_mut(&mut self.points[pos]);
        if let Some(status) = update.status {
            point.status = status;
        }
        if let Some(is_marked) = update.is_marked {
            point.is_marked = is_marked;
        }
        if let Some(retro_time) = &update.retro_time {
            point.retro_time = Some(retro_time.clone());
        }

        self.revision += 1;
        true
    }

    /// Set `is_marked` when `member_id` is in `marks`. Never clears a mark;
    /// only a fresh `load` can do that. Returns `true` if the flag flipped.
    pub fn apply_mark_for_member(
        &mut self,
        session_id: &str,
        member_id: &str,
        marks: &[String],
    ) -> bool {
        if !marks.iter().any(|mark| mark.trim() == member_id) {
            return false;
        }
        let Some(pos) = self.position(session_id) else {
            return false;
        };
        if self.points[pos].is_marked {
            return false;
        }

        Arc::make_mut(&mut self.points[pos]).is_marked = true;
        self.revision += 1;
        true
    }

    /// Recompute pixel offsets. Only points whose geometry actually moved
    /// are copied out of shared snapshots.
    pub fn layout(&mut self, layout: &ChartLayout) {
        let count = self.points.len();
        for (index, shared) in self.points.iter_mut().enumerate() {
            let x = layout.x_for(index, count);
            let y = layout.y_for(shared.duration_seconds);
            if shared.x_offset != x || shared.y_offset != y {
                let point = Arc::make_mut(shared);
                point.x_offset = x;
                point.y_offset = y;
            }
        }
    }

    pub fn highlighted_session_id(&self) -> Option<&str> {
        self.highlighted_session_id.as_deref()
    }

    /// Returns `false` for an unknown session; the current highlight is kept.
    pub fn set_highlighted(&mut self, session_id: Option<&str>) -> bool {
        match session_id {
            Some(id) if !self.contains(id) => false,
            other => {
                self.highlighted_session_id = other.map(str::to_string);
                true
            }
        }
    }

    pub fn selected_session_id(&self) -> Option<&str> {
        self.selected_session_id.as_deref()
    }

    pub fn set_selected(&mut self, session_id: Option<&str>) -> bool {
        match session_id {
            Some(id) if !self.contains(id) => false,
            other => {
                self.selected_session_id = other.map(str::to_string);
                true
            }
        }
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            points: self.points.clone(),
            highlighted_session_id: self.highlighted_session_id.clone(),
            selected_session_id: self.selected_session_id.clone(),
            revision: self.revision,
        }
    }

    fn position(&self, session_id: &str) -> Option<usize> {
        self.points
            .iter()
            .position(|point| point.session_id == session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Viewport;
    use crate::models::session::test_point;

    fn loaded(ids: &[(&str, u64)]) -> ChartModel {
        let mut model = ChartModel::new();
        model.load(ids.iter().map(|(id, d)| test_point(id, *d)).collect());
        model
    }

    #[test]
    fn load_links_points_by_position() {
        let model = loaded(&[("a", 10), ("b", 20), ("c", 30)]);
        let snapshot = model.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.points[0].previous_index, None);
        assert_eq!(snapshot.points[2].previous_index, Some(1));
        assert_eq!(snapshot.points[2].index, 2);
    }

    #[test]
    fn load_drops_highlight_for_missing_session() {
        let mut model = loaded(&[("a", 10), ("b", 20)]);
        assert!(model.set_highlighted(Some("b")));
        assert!(model.set_selected(Some("a")));

        model.load(vec![test_point("a", 15)]);
        assert_eq!(model.highlighted_session_id(), None);
        assert_eq!(model.selected_session_id(), Some("a"));
    }

    #[test]
    fn unknown_session_update_is_a_noop() {
        let mut model = loaded(&[("a", 10), ("b", 20)]);
        let before = model.snapshot();

        let applied = model.apply_status_update(
            "zzz",
            &StatusUpdate {
                status: Some(SessionStatus::Closed),
                ..Default::default()
            },
        );

        let after = model.snapshot();
        assert!(!applied);
        assert_eq!(before.revision, after.revision);
        for (old, new) in before.points.iter().zip(after.points.iter()) {
            assert!(Arc::ptr_eq(old, new));
        }
    }

    #[test]
    fn update_touches_only_its_point() {
        let mut model = loaded(&[("a", 10), ("b", 20)]);
        let before = model.snapshot();

        assert!(model.apply_status_update(
            "b",
            &StatusUpdate {
                status: Some(SessionStatus::Closed),
                ..Default::default()
            },
        ));

        let after = model.snapshot();
        assert!(Arc::ptr_eq(&before.points[0], &after.points[0]));
        assert_eq!(before.points[1].status, SessionStatus::Open);
        assert_eq!(after.points[1].status, SessionStatus::Closed);
    }

    #[test]
    fn last_applied_update_wins() {
        let mut model = loaded(&[("a", 10)]);
        let retro = SessionStamp::parse("2026-03-04 08:00:00");

        model.apply_status_update(
            "a",
            &StatusUpdate {
                status: Some(SessionStatus::Closed),
                is_marked: Some(true),
                retro_time: None,
            },
        );
        model.apply_status_update(
            "a",
            &StatusUpdate {
                status: Some(SessionStatus::Open),
                is_marked: Some(false),
                retro_time: retro.clone(),
            },
        );

        let point = model.get("a").unwrap();
        assert_eq!(point.status, SessionStatus::Open);
        assert!(!point.is_marked);
        assert_eq!(point.retro_time, retro);
    }

    #[test]
    fn marks_only_ever_set() {
        let mut model = loaded(&[("a", 10)]);
        let marks = vec!["m-2".to_string()];

        assert!(!model.apply_mark_for_member("a", "m-1", &marks));
        assert!(!model.get("a").unwrap().is_marked);

        let marks = vec!["m-2".to_string(), "m-1".to_string()];
        assert!(model.apply_mark_for_member("a", "m-1", &marks));
        assert!(model.get("a").unwrap().is_marked);

        assert!(!model.apply_mark_for_member("a", "m-1", &[]));
        assert!(model.get("a").unwrap().is_marked);

        model.load(vec![test_point("a", 10)]);
        assert!(!model.get("a").unwrap().is_marked);
    }

    #[test]
    fn layout_keeps_x_increasing_and_y_in_box() {
        let mut model = loaded(&[("a", 0), ("b", 1500), ("c", 3000), ("d", 9000)]);
        let layout = ChartLayout::default().fit(Viewport {
            width: 400.0,
            height: 200.0,
        });
        model.layout(&layout);

        let snapshot = model.snapshot();
        let xs: Vec<f64> = snapshot.iter().map(|p| p.x_offset).collect();
        assert!(xs.windows(2).all(|pair| pair[0] < pair[1]));
        for point in snapshot.iter() {
            assert!(point.y_offset >= 0.0 && point.y_offset <= layout.height);
        }
        assert_eq!(snapshot.points[2].y_offset, snapshot.points[3].y_offset);
    }

    #[test]
    fn unchanged_layout_preserves_point_identity() {
        let mut model = loaded(&[("a", 10), ("b", 20)]);
        let layout = ChartLayout::default();
        model.layout(&layout);
        let before = model.snapshot();
        model.layout(&layout);
        let after = model.snapshot();
        assert!(Arc::ptr_eq(&before.points[1], &after.points[1]));
    }
}
