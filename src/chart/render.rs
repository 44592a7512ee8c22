//! Turns a chart snapshot into a flat list of drawing commands.
//!
//! Rendering is a pure function of its inputs. Each redraw builds a new
//! `RenderFrame`; the only thing patched afterwards is the highlight and
//! selected flag of a marker, addressed through its `MarkerHandle`.

use std::collections::HashMap;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::classifier::{classify, ControlZone, DisplayState, StyleClass};
use super::model::ChartSnapshot;
use super::scaler::ChartLayout;
use super::title::week_title;

const LEGEND_SPACING: f64 = 110.0;
const NAV_INSET: f64 = 12.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    Circle,
    Cross,
}

impl MarkerShape {
    fn for_zone(zone: ControlZone) -> Self {
        match zone {
            ControlZone::InControl => MarkerShape::Circle,
            ControlZone::OutOfControl => MarkerShape::Cross,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ControlLineKind {
    Threshold,
    Zero,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum NavDirection {
    Previous,
    Next,
}

impl NavDirection {
    pub fn delta(&self) -> i32 {
        match self {
            NavDirection::Previous => -1,
            NavDirection::Next => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavDirection::Previous => "Previous",
            NavDirection::Next => "Next",
        }
    }
}

/// Index of a marker command inside its frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawCommand {
    Title {
        text: String,
        x: f64,
        y: f64,
    },
    ControlLine {
        line: ControlLineKind,
        x1: f64,
        x2: f64,
        y: f64,
        label: String,
    },
    Segment {
        session_id: String,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Marker {
        session_id: String,
        shape: MarkerShape,
        x: f64,
        y: f64,
        radius: f64,
        style: Option<StyleClass>,
        highlighted: bool,
        selected: bool,
    },
    HitTarget {
        session_id: String,
        x: f64,
        y: f64,
        radius: f64,
    },
    LegendEntry {
        state: DisplayState,
        shape: MarkerShape,
        style: Option<StyleClass>,
        x: f64,
        y: f64,
    },
    NavControl {
        direction: NavDirection,
        x: f64,
        y: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub week_offset: i32,
    pub commands: Vec<DrawCommand>,
    markers: HashMap<String, MarkerHandle>,
    hit_targets: Vec<(String, f64, f64, f64)>,
}

impl RenderFrame {
    pub fn marker_handle(&self, session_id: &str) -> Option<MarkerHandle> {
        self.markers.get(session_id).copied()
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&DrawCommand> {
        self.commands.get(handle.0)
    }

    pub fn marker_for(&self, session_id: &str) -> Option<&DrawCommand> {
        self.marker_handle(session_id)
            .and_then(|handle| self.marker(handle))
    }

    /// Flip the highlight flag on one marker. Returns the handle that was
    /// touched, or `None` for a session that isn't drawn.
    pub fn set_highlight(&mut self, session_id: &str, on: bool) -> Option<MarkerHandle> {
        let handle = self.marker_handle(session_id)?;
        if let Some(DrawCommand::Marker { highlighted, .. }) = self.commands.get_mut(handle.0) {
            *highlighted = on;
        }
        Some(handle)
    }

    pub fn set_selected(&mut self, session_id: &str, on: bool) -> Option<MarkerHandle> {
        let handle = self.marker_handle(session_id)?;
        if let Some(DrawCommand::Marker { selected, .. }) = self.commands.get_mut(handle.0) {
            *selected = on;
        }
        Some(handle)
    }

    /// Topmost hit target containing `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        self.hit_targets
            .iter()
            .rev()
            .find(|(_, cx, cy, radius)| (x - cx).powi(2) + (y - cy).powi(2) <= radius.powi(2))
            .map(|(session_id, ..)| session_id.as_str())
    }

    pub fn has_nav(&self, direction: NavDirection) -> bool {
        self.commands.iter().any(|command| {
            matches!(command, DrawCommand::NavControl { direction: d, .. } if *d == direction)
        })
    }
}

/// Inputs to one render pass besides the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub layout: ChartLayout,
    pub week_offset: i32,
    pub today: NaiveDate,
    pub week_start: Weekday,
}

pub struct RenderEngine;

impl RenderEngine {
    pub fn render(snapshot: &ChartSnapshot, ctx: &RenderContext) -> RenderFrame {
        let layout = &ctx.layout;
        let zero_y = layout.zero_line_y();
        let threshold_y = layout.threshold_line_y();
        let right_x = (layout.width - layout.right_margin).max(layout.left_margin);

        let title = week_title(ctx.today, ctx.week_offset, ctx.week_start);
        let mut commands = Vec::with_capacity(snapshot.len() * 3 + 10);

        commands.push(DrawCommand::Title {
            text: title.clone(),
            x: layout.width / 2.0,
            y: layout.control_line_margin / 4.0,
        });

        for (i, state) in DisplayState::ALL.iter().enumerate() {
            let (shape, style) = legend_look(*state);
            commands.push(DrawCommand::LegendEntry {
                state: *state,
                shape,
                style,
                x: layout.left_margin + LEGEND_SPACING * i as f64,
                y: layout.control_line_margin / 2.0,
            });
        }

        commands.push(DrawCommand::ControlLine {
            line: ControlLineKind::Threshold,
            x1: layout.left_margin,
            x2: right_x,
            y: threshold_y,
            label: "50m".to_string(),
        });
        commands.push(DrawCommand::ControlLine {
            line: ControlLineKind::Zero,
            x1: layout.left_margin,
            x2: right_x,
            y: zero_y,
            label: "0m".to_string(),
        });

        // Segments go first so markers paint over them.
        let mut previous = (layout.left_margin, zero_y);
        for point in snapshot.iter() {
            commands.push(DrawCommand::Segment {
                session_id: point.session_id.clone(),
                x1: previous.0,
                y1: previous.1,
                x2: point.x_offset,
                y2: point.y_offset,
            });
            previous = (point.x_offset, point.y_offset);
        }

        let highlighted = snapshot.highlighted_session_id.as_deref();
        let selected = snapshot.selected_session_id.as_deref();
        let mut markers = HashMap::with_capacity(snapshot.len());
        let mut hit_targets = Vec::with_capacity(snapshot.len());

        for point in snapshot.iter() {
            let classification = classify(point);
            markers.insert(point.session_id.clone(), MarkerHandle(commands.len()));
            commands.push(DrawCommand::Marker {
                session_id: point.session_id.clone(),
                shape: MarkerShape::for_zone(classification.zone),
                x: point.x_offset,
                y: point.y_offset,
                radius: layout.marker_radius,
                style: classification.style_class,
                highlighted: highlighted == Some(point.session_id.as_str()),
                selected: selected == Some(point.session_id.as_str()),
            });
        }

        // Hit targets last: they sit on top of everything else.
        for point in snapshot.iter() {
            commands.push(DrawCommand::HitTarget {
                session_id: point.session_id.clone(),
                x: point.x_offset,
                y: point.y_offset,
                radius: layout.hit_radius,
            });
            hit_targets.push((
                point.session_id.clone(),
                point.x_offset,
                point.y_offset,
                layout.hit_radius,
            ));
        }

        let nav_y = (zero_y + layout.height) / 2.0;
        commands.push(DrawCommand::NavControl {
            direction: NavDirection::Previous,
            x: layout.left_margin + NAV_INSET,
            y: nav_y,
        });
        if ctx.week_offset < 0 {
            commands.push(DrawCommand::NavControl {
                direction: NavDirection::Next,
                x: right_x - NAV_INSET,
                y: nav_y,
            });
        }

        RenderFrame {
            title,
            width: layout.width,
            height: layout.height,
            week_offset: ctx.week_offset,
            commands,
            markers,
            hit_targets,
        }
    }
}

fn legend_look(state: DisplayState) -> (MarkerShape, Option<StyleClass>) {
    match state {
        DisplayState::NeedsReview => (MarkerShape::Cross, Some(StyleClass::Trouble)),
        DisplayState::RetroInProgress => (MarkerShape::Circle, Some(StyleClass::Retro)),
        DisplayState::Reviewed | DisplayState::Closed => {
            (MarkerShape::Circle, Some(StyleClass::Closed))
        }
        DisplayState::Solved => (MarkerShape::Circle, None),
    }
}
