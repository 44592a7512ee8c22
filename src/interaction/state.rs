use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HoverSource {
    /// The pointer is over the point's hit target.
    Pointer,
    /// The companion list is hovering the matching row.
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering {
        session_id: String,
        source: HoverSource,
    },
    Navigating {
        target_week: i32,
    },
}

impl InteractionState {
    pub fn is_navigating(&self) -> bool {
        matches!(self, InteractionState::Navigating { .. })
    }

    pub fn hover_source(&self) -> Option<HoverSource> {
        match self {
            InteractionState::Hovering { source, .. } => Some(*source),
            _ => None,
        }
    }
}

/// Proof that a week load was requested. Only the ticket from the latest
/// request can commit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavTicket {
    pub generation: u64,
    pub week_offset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartViewState {
    /// 0 is the current week, negative is the past. Never positive.
    pub week_offset: i32,
    pub interaction: InteractionState,
    pub nav_generation: u64,
}

impl ChartViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load for `week_offset`, superseding any load in flight.
    /// Returns `None` for weeks in the future.
    pub fn begin_navigation(&mut self, week_offset: i32) -> Option<NavTicket> {
        if week_offset > 0 {
            return None;
        }

        self.nav_generation += 1;
        self.interaction = InteractionState::Navigating {
            target_week: week_offset,
        };
        Some(NavTicket {
            generation: self.nav_generation,
            week_offset,
        })
    }

    pub fn is_current(&self, ticket: &NavTicket) -> bool {
        ticket.generation == self.nav_generation
    }

    /// Commit a load. Stale tickets are rejected and change nothing.
    pub fn finish_navigation(&mut self, ticket: &NavTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.week_offset = ticket.week_offset;
        if self.interaction.is_navigating() {
            self.interaction = InteractionState::Idle;
        }
        true
    }

    /// A failed load: stay on the week already shown.
    pub fn abandon_navigation(&mut self, ticket: &NavTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        if self.interaction.is_navigating() {
            self.interaction = InteractionState::Idle;
        }
        true
    }
}
