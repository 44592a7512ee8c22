use serde::{Deserialize, Serialize};

use crate::models::{SessionStatus, TroublePoint};

/// Upper control limit: 50 minutes.
pub const THRESHOLD_SECONDS: u64 = 3000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ControlZone {
    InControl,
    OutOfControl,
}

impl ControlZone {
    pub fn for_duration(duration_seconds: u64) -> Self {
        if duration_seconds >= THRESHOLD_SECONDS {
            ControlZone::OutOfControl
        } else {
            ControlZone::InControl
        }
    }
}

/// Status and mark folded together; computed once per classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Unresolved,
    Closed,
}

impl Resolution {
    fn of(status: SessionStatus, is_marked: bool) -> Self {
        if status == SessionStatus::Closed || is_marked {
            Resolution::Closed
        } else {
            Resolution::Unresolved
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayState {
    NeedsReview,
    RetroInProgress,
    Reviewed,
    Closed,
    Solved,
}

impl DisplayState {
    pub const ALL: [DisplayState; 5] = [
        DisplayState::NeedsReview,
        DisplayState::RetroInProgress,
        DisplayState::Reviewed,
        DisplayState::Closed,
        DisplayState::Solved,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayState::NeedsReview => "NEEDS REVIEW",
            DisplayState::RetroInProgress => "RETRO IN PROGRESS",
            DisplayState::Reviewed => "REVIEWED",
            DisplayState::Closed => "CLOSED",
            DisplayState::Solved => "SOLVED",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StyleClass {
    Closed,
    Retro,
    Trouble,
}

impl StyleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleClass::Closed => "closed",
            StyleClass::Retro => "retro",
            StyleClass::Trouble => "trouble",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub zone: ControlZone,
    pub display_state: DisplayState,
    pub style_class: Option<StyleClass>,
}

impl Classification {
    pub fn style_name(&self) -> &'static str {
        self.style_class.map(|class| class.as_str()).unwrap_or("")
    }
}

pub fn classify(point: &TroublePoint) -> Classification {
    classify_parts(
        point.duration_seconds,
        point.status,
        point.has_retro(),
        point.is_marked,
    )
}

pub fn classify_parts(
    duration_seconds: u64,
    status: SessionStatus,
    has_retro: bool,
    is_marked: bool,
) -> Classification {
    use ControlZone::{InControl, OutOfControl};
    use Resolution::{Closed, Unresolved};

    let zone = ControlZone::for_duration(duration_seconds);
    let resolution = Resolution::of(status, is_marked);

    let display_state = match (zone, resolution, has_retro) {
        (OutOfControl, Unresolved, false) => DisplayState::NeedsReview,
        (OutOfControl, Unresolved, true) => DisplayState::RetroInProgress,
        (OutOfControl, Closed, true) => DisplayState::Reviewed,
        (OutOfControl, Closed, false) => DisplayState::Closed,
        (InControl, Unresolved, false) => DisplayState::Solved,
        (InControl, Unresolved, true) => DisplayState::RetroInProgress,
        (InControl, Closed, true) => DisplayState::Reviewed,
        (InControl, Closed, false) => DisplayState::Closed,
    };

    let style_class = match (resolution, has_retro, zone) {
        (Closed, _, _) => Some(StyleClass::Closed),
        (Unresolved, true, _) => Some(StyleClass::Retro),
        (Unresolved, false, OutOfControl) => Some(StyleClass::Trouble),
        (Unresolved, false, InControl) => None,
    };

    Classification {
        zone,
        display_state,
        style_class,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::test_point;
    use crate::models::SessionStamp;

    #[test]
    fn unreviewed_long_session_needs_review() {
        let point = test_point("s1", 3001);
        let result = classify(&point);
        assert_eq!(result.display_state.label(), "NEEDS REVIEW");
        assert_eq!(result.style_class, Some(StyleClass::Trouble));
        assert_eq!(result.style_name(), "trouble");
    }

    #[test]
    fn closed_short_session_is_closed() {
        let mut point = test_point("s1", 1500);
        point.status = SessionStatus::Closed;
        let result = classify(&point);
        assert_eq!(result.display_state.label(), "CLOSED");
        assert_eq!(result.style_class, Some(StyleClass::Closed));
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(ControlZone::for_duration(2999), ControlZone::InControl);
        assert_eq!(ControlZone::for_duration(3000), ControlZone::OutOfControl);
    }

    #[test]
    fn full_decision_table() {
        use DisplayState::*;
        use SessionStatus::{Closed as C, Open as O};

        // (duration, status, retro, marked) -> (state, class)
        let cases = [
            (3000, O, false, false, NeedsReview, Some(StyleClass::Trouble)),
            (3000, O, true, false, RetroInProgress, Some(StyleClass::Retro)),
            (3000, C, true, false, Reviewed, Some(StyleClass::Closed)),
            (3000, O, true, true, Reviewed, Some(StyleClass::Closed)),
            (3000, C, false, false, Closed, Some(StyleClass::Closed)),
            (3000, O, false, true, Closed, Some(StyleClass::Closed)),
            (10, O, false, false, Solved, None),
            (10, O, true, false, RetroInProgress, Some(StyleClass::Retro)),
            (10, C, true, true, Reviewed, Some(StyleClass::Closed)),
            (10, C, false, false, Closed, Some(StyleClass::Closed)),
            (10, O, false, true, Closed, Some(StyleClass::Closed)),
        ];

        for (duration, status, retro, marked, state, class) in cases {
            let result = classify_parts(duration, status, retro, marked);
            assert_eq!(result.display_state, state, "{duration} {status:?} {retro} {marked}");
            assert_eq!(result.style_class, class, "{duration} {status:?} {retro} {marked}");
        }
    }

    #[test]
    fn classification_is_idempotent() {
        let mut point = test_point("s1", 3400);
        point.retro_time = SessionStamp::parse("2026-03-02 10:00:00");
        assert_eq!(classify(&point), classify(&point));
    }
}
