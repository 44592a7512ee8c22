use serde::{Deserialize, Serialize};

use super::classifier::THRESHOLD_SECONDS;

/// Host-reported size of the chart container.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Geometry of the plotted box. `width`/`height` are replaced by the
/// viewport on every layout pass; margins come from settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    /// Space below the zero line (nav controls live here).
    pub zero_margin: f64,
    /// Space above the threshold line (title and legend live here).
    pub control_line_margin: f64,
    pub left_margin: f64,
    pub right_margin: f64,
    pub marker_radius: f64,
    pub hit_radius: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 560.0,
            height: 260.0,
            zero_margin: 30.0,
            control_line_margin: 50.0,
            left_margin: 40.0,
            right_margin: 20.0,
            marker_radius: 5.0,
            hit_radius: 12.0,
        }
    }
}

impl ChartLayout {
    pub fn fit(&self, viewport: Viewport) -> Self {
        Self {
            width: viewport.width.max(0.0),
            height: viewport.height.max(0.0),
            ..*self
        }
    }

    /// Y of the zero-duration line, measured from the chart top.
    pub fn zero_line_y(&self) -> f64 {
        (self.height - self.zero_margin).clamp(0.0, self.height.max(0.0))
    }

    /// Y of the threshold control line, measured from the chart top.
    pub fn threshold_line_y(&self) -> f64 {
        self.y_for(THRESHOLD_SECONDS)
    }

    pub fn y_for(&self, duration_seconds: u64) -> f64 {
        let lift = offset_for(
            duration_seconds,
            self.height,
            self.zero_margin,
            self.control_line_margin,
        );
        (self.zero_line_y() - lift).max(0.0)
    }

    /// Points are spread evenly to the right of the zero-line anchor at
    /// `left_margin`; spacing never drops below one pixel so x stays
    /// strictly increasing.
    pub fn x_for(&self, index: usize, count: usize) -> f64 {
        let usable = (self.width - self.left_margin - self.right_margin).max(0.0);
        let spacing = (usable / count.max(1) as f64).max(MIN_POINT_SPACING);
        self.left_margin + spacing * (index as f64 + 1.0)
    }
}

const MIN_POINT_SPACING: f64 = 1.0;

/// Height above the zero line for a duration.
///
/// Maps `[0, THRESHOLD_SECONDS]` linearly onto
/// `[0, box_height - control_line_margin - zero_margin]`. Longer sessions are
/// capped at the threshold. Depends on nothing but its arguments, so a single
/// point can be re-laid out without touching the rest of the series.
pub fn offset_for(
    duration_seconds: u64,
    box_height: f64,
    zero_margin: f64,
    control_line_margin: f64,
) -> f64 {
    let ceiling = box_height.max(0.0);
    let range = (box_height - control_line_margin - zero_margin).clamp(0.0, ceiling);
    let capped = duration_seconds.min(THRESHOLD_SECONDS) as f64;

    (capped / THRESHOLD_SECONDS as f64 * range).clamp(0.0, range)
}
