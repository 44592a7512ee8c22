use std::collections::HashMap;

use crate::error::ChartError;
use crate::models::dto::columns;
use crate::models::{SessionStamp, SessionStatus, TroublePoint};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Points that survived parsing plus a warning for every row that didn't.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub points: Vec<TroublePoint>,
    pub warnings: Vec<ChartError>,
}

/// Convert padded rows into ordered points.
///
/// A bad row is dropped with a warning; it never blanks the whole chart.
/// When a session id repeats, the later row wins and the earlier one is removed.
pub fn parse_rows(rows: &[Vec<String>]) -> ParseReport {
    let mut slots: Vec<Option<TroublePoint>> = Vec::with_capacity(rows.len());
    let mut seen: HashMap<String, (usize, usize)> = HashMap::new();
    let mut warnings = Vec::new();

    for (row_index, cells) in rows.iter().enumerate() {
        let point = match parse_row(row_index, cells) {
            Ok(point) => point,
            Err(err) => {
                log_warn!("dropping chart row: {}", err);
                warnings.push(err);
                continue;
            }
        };

        if let Some((slot, replaced_row)) = seen.get(&point.session_id).copied() {
            let err = ChartError::DuplicateSession {
                row: row_index,
                replaced_row,
                session_id: point.session_id.clone(),
            };
            log_warn!("{}", err);
            warnings.push(err);
            slots[slot] = None;
        }

        seen.insert(point.session_id.clone(), (slots.len(), row_index));
        slots.push(Some(point));
    }

    let mut points: Vec<TroublePoint> = slots.into_iter().flatten().collect();
    for (index, point) in points.iter_mut().enumerate() {
        point.index = index;
        point.previous_index = index.checked_sub(1);
    }

    log_debug!(
        "parsed {} points from {} rows ({} warnings)",
        points.len(),
        rows.len(),
        warnings.len()
    );

    ParseReport { points, warnings }
}

fn parse_row(row: usize, cells: &[String]) -> Result<TroublePoint, ChartError> {
    if cells.len() < columns::COUNT {
        return Err(ChartError::malformed(
            row,
            format!("expected {} cells, found {}", columns::COUNT, cells.len()),
        ));
    }

    let cell = move |column: usize| cells[column].trim();

    let session_id = cell(columns::SESSION_ID);
    if session_id.is_empty() {
        return Err(ChartError::malformed(row, "missing session id"));
    }

    let raw_duration = cell(columns::DURATION_SECONDS);
    let duration_seconds = raw_duration.parse::<u64>().map_err(|_| {
        ChartError::malformed(
            row,
            format!("duration {raw_duration:?} is not a non-negative integer"),
        )
    })?;

    Ok(TroublePoint {
        session_id: session_id.to_string(),
        username: cell(columns::USERNAME).to_string(),
        full_name: cell(columns::FULL_NAME).to_string(),
        description: cell(columns::DESCRIPTION).to_string(),
        coords: cell(columns::COORDS).to_string(),
        duration_seconds,
        solved_time: SessionStamp::parse(cell(columns::SOLVED_TIME)),
        retro_time: SessionStamp::parse(cell(columns::RETRO_TIME)),
        status: SessionStatus::from_token(cell(columns::STATUS)),
        is_marked: parse_flag(cell(columns::MARKED_FLAG)),
        x_offset: 0.0,
        y_offset: 0.0,
        index: 0,
        previous_index: None,
    })
}

fn parse_flag(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "yes" | "y"
    )
}
