//! Access to the engine's REST API.
//!
//! [`Backend`] has one method per endpoint. [`HttpBackend`] talks to a real
//! server; [`SimulatedBackend`] stands in for one in-process.

mod http;
mod simulated;

pub use http::HttpBackend;
pub use simulated::{default_engine_config, SimulatedBackend};

use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{Config, EngineStatus, StatsSnapshot};

/// Endpoint paths, relative to the server root.
pub mod endpoints {
    pub const CONFIG: &str = "/api/config";
    pub const STATS: &str = "/api/stats";
    pub const STATS_CLEAR: &str = "/api/stats/clear";
    pub const START: &str = "/api/start";
    pub const STOP: &str = "/api/stop";
    pub const STATUS: &str = "/api/status";
}

/// The engine as seen through its REST API.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/config`
    async fn fetch_config(&self) -> Result<Config, BackendError>;

    /// `POST /api/config`
    async fn submit_config(&self, config: &Config) -> Result<(), BackendError>;

    /// `GET /api/stats`
    async fn fetch_stats(&self) -> Result<StatsSnapshot, BackendError>;

    /// `POST /api/stats/clear`
    async fn clear_stats(&self) -> Result<(), BackendError>;

    /// `POST /api/start`
    async fn start(&self) -> Result<(), BackendError>;

    /// `POST /api/stop`
    async fn stop(&self) -> Result<(), BackendError>;

    /// `GET /api/status`
    async fn status(&self) -> Result<EngineStatus, BackendError>;
}
