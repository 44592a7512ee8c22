//! Wire shapes handed to the chart by the host: the week's chart series and
//! the talk-channel messages that carry live status changes.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const WTF_STATUS_UPDATE: &str = "WTF_STATUS_UPDATE";

/// Fixed column order of `rows_of_padded_cells`.
pub mod columns {
    pub const USERNAME: usize = 0;
    pub const FULL_NAME: usize = 1;
    pub const SESSION_ID: usize = 2;
    pub const DURATION_SECONDS: usize = 3;
    pub const COORDS: usize = 4;
    pub const SOLVED_TIME: usize = 5;
    pub const RETRO_TIME: usize = 6;
    pub const STATUS: usize = 7;
    pub const DESCRIPTION: usize = 8;
    pub const MARKED_FLAG: usize = 9;

    pub const COUNT: usize = 10;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows_of_padded_cells: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDto {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub target_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub chart_series: ChartSeries,
    #[serde(default)]
    pub event_series_by_type: HashMap<String, Value>,
    #[serde(default)]
    pub feature_sets_by_type: HashMap<String, Value>,
}

impl ChartDto {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to decode chart dto")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningCircuitDto {
    pub session_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub member_marks_for_close: Option<Vec<String>>,
    #[serde(default)]
    pub retro_started_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CircuitStatusUpdate {
    pub learning_circuit_dto: LearningCircuitDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkMessage {
    pub message_type: String,
    #[serde(default)]
    pub data: Value,
}

impl TalkMessage {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to decode talk message")
    }

    /// Returns `Ok(None)` for any message type other than a WTF status update.
    pub fn status_update(&self) -> Result<Option<CircuitStatusUpdate>> {
        if self.message_type != WTF_STATUS_UPDATE {
            return Ok(None);
        }

        let update = serde_json::from_value(self.data.clone())
            .context("malformed WTF_STATUS_UPDATE payload")?;
        Ok(Some(update))
    }
}
