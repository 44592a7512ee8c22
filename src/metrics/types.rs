use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateCounts {
    pub needs_review: usize,
    pub retro_in_progress: usize,
    pub reviewed: usize,
    pub closed: usize,
    pub solved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetrics {
    pub revision: u64,
    pub total_count: usize,
    pub states: StateCounts,
    pub out_of_control_count: usize,
    pub retro_count: usize,
    /// Share of sessions at or past the threshold; 0.0 on an empty chart.
    pub out_of_control_ratio: f64,
    /// Share of sessions closed by status or mark; 0.0 on an empty chart.
    pub closed_ratio: f64,
    pub average_duration_secs: f64,
    pub max_duration_secs: u64,
    pub total_duration_secs: u64,
}

impl Default for ChartMetrics {
    fn default() -> Self {
        Self {
            revision: 0,
            total_count: 0,
            states: StateCounts::default(),
            out_of_control_count: 0,
            retro_count: 0,
            out_of_control_ratio: 0.0,
            closed_ratio: 0.0,
            average_duration_secs: 0.0,
            max_duration_secs: 0,
            total_duration_secs: 0,
        }
    }
}
