//! Console settings file.
//!
//! These are the console's own knobs (where the server is, how often to
//! poll), not the engine config the console edits. Stored as TOML with one
//! table per concern:
//!
//! ```toml
//! [backend]
//! base_url = "http://127.0.0.1:8080"
//!
//! [poller]
//! interval_ms = 1000
//! overlap = "allow"
//! ```

mod manager;
mod types;

pub use manager::{default_settings_path, SettingsError, SettingsManager, SettingsResult};
pub use types::{
    AlertSettings, BackendSettings, ChartSettings, ExportSettings, LoggingSettings,
    PollerSettings, Settings,
};
