//! Completions delivered back to the controller.

use crate::error::BackendError;
use crate::models::{Config, EngineStatus, StatsSnapshot};
use crate::notify::AlertId;

/// Something finished in the background.
///
/// Events are applied in the order they arrive, which for requests is the
/// order the responses came back, not the order they were issued.
#[derive(Debug)]
pub enum Event {
    ConfigLoaded(Result<Config, BackendError>),
    ConfigSaved {
        submitted: Config,
        result: Result<(), BackendError>,
    },
    StatsFetched(Result<StatsSnapshot, BackendError>),
    StatsCleared(Result<(), BackendError>),
    ToggleFinished(Result<(), BackendError>),
    EngineStatus(Result<EngineStatus, BackendError>),
    AlertExpired(AlertId),
}

impl Event {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ConfigLoaded(_) => "config_loaded",
            Event::ConfigSaved { .. } => "config_saved",
            Event::StatsFetched(_) => "stats_fetched",
            Event::StatsCleared(_) => "stats_cleared",
            Event::ToggleFinished(_) => "toggle_finished",
            Event::EngineStatus(_) => "engine_status",
            Event::AlertExpired(_) => "alert_expired",
        }
    }
}
