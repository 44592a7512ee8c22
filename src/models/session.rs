use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::THRESHOLD_SECONDS;

/// Raw upstream status token, reduced to the two states the chart cares about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    #[default]
    Open,
    Closed,
}

impl SessionStatus {
    /// Any token other than `CLOSED` (case-insensitive) counts as open.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("closed") {
            SessionStatus::Closed
        } else {
            SessionStatus::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "OPEN",
            SessionStatus::Closed => "CLOSED",
        }
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A timestamp cell. The trimmed text is kept even when it doesn't parse,
/// since presence alone decides things like `has_retro`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStamp {
    pub raw: String,
    pub at: Option<DateTime<Utc>>,
}

impl SessionStamp {
    /// Returns `None` for blank cells.
    pub fn parse(cell: &str) -> Option<Self> {
        let raw = cell.trim();
        if raw.is_empty() {
            return None;
        }

        let at = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NAIVE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|naive| naive.and_utc())
            });

        Some(Self {
            raw: raw.to_string(),
            at,
        })
    }
}

/// One plotted session. Owned by `ChartModel`; `x_offset`/`y_offset` are
/// rewritten on every layout pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TroublePoint {
    pub session_id: String,
    pub username: String,
    pub full_name: String,
    pub description: String,
    pub coords: String,
    pub duration_seconds: u64,
    pub solved_time: Option<SessionStamp>,
    pub retro_time: Option<SessionStamp>,
    pub status: SessionStatus,
    pub is_marked: bool,
    pub x_offset: f64,
    pub y_offset: f64,
    /// Position in the series; `previous_index` always equals `index - 1`.
    pub index: usize,
    pub previous_index: Option<usize>,
}

impl TroublePoint {
    pub fn has_retro(&self) -> bool {
        self.retro_time.is_some()
    }

    pub fn is_over_threshold(&self) -> bool {
        self.duration_seconds >= THRESHOLD_SECONDS
    }

    pub fn is_closed(&self) -> bool {
        self.status == SessionStatus::Closed || self.is_marked
    }

    /// Whole minutes, rounded down, for tooltips and list rows.
    pub fn duration_minutes(&self) -> u64 {
        self.duration_seconds / 60
    }
}

#[cfg(test)]
pub(crate) fn test_point(session_id: &str, duration_seconds: u64) -> TroublePoint {
    TroublePoint {
        session_id: session_id.to_string(),
        username: "ann".into(),
        full_name: "Ann Example".into(),
        description: String::new(),
        coords: String::new(),
        duration_seconds,
        solved_time: None,
        retro_time: None,
        status: SessionStatus::Open,
        is_marked: false,
        x_offset: 0.0,
        y_offset: 0.0,
        index: 0,
        previous_index: None,
    }
}
