//! Data types exchanged with the engine and shown to the operator.

mod config;
mod state;
mod stats;

pub use config::{Config, ConfigValue};
pub use state::{ButtonStyle, EngineStatus, StatusIndicator, SystemState, ToggleAffordance};
pub use stats::{format_count, Counter, StatsSnapshot};
