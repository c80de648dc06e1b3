//! Engine run state and how it is presented.

use serde::{Deserialize, Serialize};

/// Whether the engine is running, as far as the console knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemState {
    #[default]
    Stopped,
    Running,
}

impl SystemState {
    pub fn is_running(&self) -> bool {
        matches!(self, SystemState::Running)
    }

    /// The opposite state.
    pub fn toggled(&self) -> Self {
        match self {
            SystemState::Stopped => SystemState::Running,
            SystemState::Running => SystemState::Stopped,
        }
    }

    /// Status line shown next to the counters.
    pub fn indicator(&self) -> StatusIndicator {
        match self {
            SystemState::Running => StatusIndicator {
                glyph: '●',
                label: "Running",
                running: true,
            },
            SystemState::Stopped => StatusIndicator {
                glyph: '●',
                label: "Stopped",
                running: false,
            },
        }
    }

    /// What the start/stop control offers in this state.
    pub fn affordance(&self) -> ToggleAffordance {
        match self {
            SystemState::Running => ToggleAffordance {
                label: "⏹ Stop",
                style: ButtonStyle::Danger,
            },
            SystemState::Stopped => ToggleAffordance {
                label: "▶ Start",
                style: ButtonStyle::Success,
            },
        }
    }
}

/// Rendered form of the system status slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIndicator {
    pub glyph: char,
    pub label: &'static str,
    /// Selects the affirmative or negative styling.
    pub running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Success,
    Danger,
}

/// Label and style of the start/stop control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleAffordance {
    pub label: &'static str,
    pub style: ButtonStyle,
}

/// Payload of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub running: bool,
    #[serde(default)]
    pub uptime: String,
}
