use serde::{Deserialize, Serialize};

use crate::chart::{classify, ChartLayout};
use crate::models::TroublePoint;

/// Points lower than this (in px from the chart top) get their tooltip above.
pub const TOOLTIP_FLIP_Y: f64 = 120.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TooltipAnchor {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub session_id: String,
    pub anchor: TooltipAnchor,
    pub x: f64,
    pub y: f64,
    pub heading: String,
    pub lines: Vec<String>,
}

pub fn anchor_for(y_offset: f64) -> TooltipAnchor {
    if y_offset > TOOLTIP_FLIP_Y {
        TooltipAnchor::Above
    } else {
        TooltipAnchor::Below
    }
}

pub fn place_tooltip(point: &TroublePoint, layout: &ChartLayout) -> Tooltip {
    let anchor = anchor_for(point.y_offset);
    let y = match anchor {
        TooltipAnchor::Above => point.y_offset - layout.hit_radius,
        TooltipAnchor::Below => point.y_offset + layout.hit_radius,
    };

    let name = if point.full_name.is_empty() {
        &point.username
    } else {
        &point.full_name
    };
    let mut lines = vec![
        name.clone(),
        format!("{} min", point.duration_minutes()),
    ];
    if !point.description.is_empty() {
        lines.push(point.description.clone());
    }

    Tooltip {
        session_id: point.session_id.clone(),
        anchor,
        x: point.x_offset,
        y,
        heading: classify(point).display_state.label().to_string(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::test_point;

    #[test]
    fn flips_at_the_fixed_line() {
        assert_eq!(anchor_for(0.0), TooltipAnchor::Below);
        assert_eq!(anchor_for(120.0), TooltipAnchor::Below);
        assert_eq!(anchor_for(120.5), TooltipAnchor::Above);
    }

    #[test]
    fn tooltip_sits_on_the_chosen_side() {
        let layout = ChartLayout::default();
        let mut point = test_point("s1", 3200);
        point.x_offset = 80.0;

        point.y_offset = 60.0;
        let below = place_tooltip(&point, &layout);
        assert_eq!(below.anchor, TooltipAnchor::Below);
        assert!(below.y > point.y_offset);
        assert_eq!(below.heading, "NEEDS REVIEW");
        assert_eq!(below.lines[1], "53 min");

        point.y_offset = 200.0;
        let above = place_tooltip(&point, &layout);
        assert_eq!(above.anchor, TooltipAnchor::Above);
        assert!(above.y < point.y_offset);
        assert_eq!(above.x, 80.0);
    }
}
