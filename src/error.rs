//! Error taxonomy for the chart engine.
//!
//! Only `MalformedRow` and `DuplicateSession` are ever surfaced, and only as
//! warnings attached to a parse report. Unknown sessions and stale
//! navigations are plain no-ops and have no variant here.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("row {row}: duplicate session {session_id} replaces row {replaced_row}")]
    DuplicateSession {
        row: usize,
        replaced_row: usize,
        session_id: String,
    },

    #[error("chart container is not mounted")]
    RenderPrecondition,
}

impl ChartError {
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        ChartError::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}
