//! The controller owns all console state and applies every change to it.
//!
//! Operator actions are methods on [`Controller`]. Anything that needs the
//! network runs on its own task and reports back as an [`Event`]; the front
//! end feeds those into [`Controller::handle`] from a single loop, so state
//! has exactly one writer and needs no locking.
//!
//! ```no_run
//! # async fn run(mut controller: clientgen_core::Controller) {
//! controller.startup();
//! while let Some(event) = controller.next_event().await {
//!     controller.handle(event);
//! }
//! # }
//! ```

mod dispatch;
mod events;

pub use dispatch::Dispatcher;
pub use events::Event;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::chart::{ChartBuffer, CHART_CAPACITY};
use crate::config_sync::ConfigSync;
use crate::error::TransferError;
use crate::models::{Config, StatsSnapshot, SystemState};
use crate::notify::{NotificationQueue, ALERT_TTL};
use crate::poller::{OverlapPolicy, StatsPoller, POLL_INTERVAL};
use crate::ports::{ArtifactSink, Confirm, CounterDisplay, EditSurface, Surfaces};
use crate::settings::Settings;
use crate::toggle::SystemToggle;
use crate::transfer::{self, EXPORT_FILE_NAME};

/// Question asked before clearing the engine counters.
pub const CLEAR_STATS_PROMPT: &str = "Are you sure you want to clear the statistics?";

/// Timing knobs for the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub poll_interval: Duration,
    pub overlap: OverlapPolicy,
    pub alert_ttl: Duration,
    pub chart_capacity: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            overlap: OverlapPolicy::default(),
            alert_ttl: ALERT_TTL,
            chart_capacity: CHART_CAPACITY,
        }
    }
}

impl From<&Settings> for ControllerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            poll_interval: Duration::from_millis(settings.poller.interval_ms.max(1)),
            overlap: settings.poller.overlap,
            alert_ttl: Duration::from_millis(settings.alerts.ttl_ms),
            chart_capacity: settings.chart.capacity,
        }
    }
}

/// Owner of all console state.
///
/// Operator actions are methods; background completions arrive as [`Event`]s
/// and are applied by [`Controller::handle`]. Only the task that drains the
/// events may touch the controller.
pub struct Controller {
    events: mpsc::UnboundedReceiver<Event>,
    dispatch: Dispatcher,
    config: ConfigSync,
    poller: StatsPoller,
    chart: ChartBuffer,
    toggle: SystemToggle,
    alerts: NotificationQueue,
    artifacts: Box<dyn ArtifactSink>,
}

impl Controller {
    /// Wire the components to `backend` and the presentation ports.
    pub fn new(backend: Arc<dyn Backend>, surfaces: Surfaces, options: ControllerOptions) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let dispatch = Dispatcher::new(backend, tx);

        Self {
            events,
            config: ConfigSync::new(surfaces.edit, dispatch.clone()),
            poller: StatsPoller::new(
                surfaces.counters,
                dispatch.clone(),
                options.poll_interval,
                options.overlap,
            ),
            chart: ChartBuffer::with_capacity(surfaces.chart, options.chart_capacity),
            toggle: SystemToggle::new(surfaces.toggle, dispatch.clone()),
            alerts: NotificationQueue::new(surfaces.alerts, dispatch.clone(), options.alert_ttl),
            artifacts: surfaces.artifacts,
            dispatch,
        }
    }

    /// Load the config, fetch stats once, then poll on the cadence.
    pub fn startup(&mut self) {
        info!("controller starting");
        self.config.load();
        self.poller.fetch_now();
        self.poller.start();
    }

    /// Fetch the engine config. A failed load keeps the current one.
    pub fn load_config(&mut self) {
        self.config.load();
    }

    /// Submit the edit surface contents as the new config.
    pub fn save_config(&mut self) {
        self.config.save();
    }

    /// Start a stopped engine or stop a running one.
    pub fn toggle(&mut self) -> bool {
        self.toggle.toggle()
    }

    /// Clear the engine counters after the operator confirms.
    ///
    /// Declining sends nothing. Returns whether a request was issued.
    pub async fn clear_stats(&mut self, confirm: &mut dyn Confirm) -> bool {
        if !confirm.confirm(CLEAR_STATS_PROMPT).await {
            debug!("clear stats declined");
            return false;
        }
        self.dispatch
            .request(|backend| async move { Event::StatsCleared(backend.clear_stats().await) });
        true
    }

    /// Ask the engine whether it is running. Reported to the counter
    /// display only; the toggle state is not touched.
    pub fn query_status(&mut self) {
        self.dispatch
            .request(|backend| async move { Event::EngineStatus(backend.status().await) });
    }

    /// Hand the current config to the artifact sink as a JSON document.
    ///
    /// Returns where the sink put it.
    pub fn export_config(&mut self) -> Option<String> {
        let written = transfer::export_document(self.config.config())
            .and_then(|document| {
                self.artifacts
                    .offer(EXPORT_FILE_NAME, &document)
                    .map_err(TransferError::Write)
            });

        match written {
            Ok(location) => {
                info!(%location, options = self.config.config().len(), "config exported");
                Some(location)
            }
            Err(err) => {
                warn!(%err, "config export failed");
                self.alerts.error("Failed to export configuration");
                None
            }
        }
    }

    /// Replace the config with the document at `path`.
    ///
    /// On any read or parse failure the config is left as it was.
    pub async fn import_config(&mut self, path: &Path) -> bool {
        match transfer::read_document(path).await {
            Ok(config) => {
                info!(path = %path.display(), options = config.len(), "config imported");
                self.config.replace(config);
                self.alerts.success("Configuration imported successfully");
                true
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "config import failed");
                self.alerts.error("Failed to import configuration");
                false
            }
        }
    }

    /// Start the stats ticker, restarting it if it already runs.
    pub fn start_polling(&mut self) {
        self.poller.start();
    }

    /// Stop the ticker. Fetches already issued are still applied.
    pub fn stop_polling(&mut self) {
        self.poller.stop();
    }

    /// Wait for the next background completion.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Apply every event that has already arrived. Returns how many.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
            applied += 1;
        }
        applied
    }

    /// Apply one completion to the owning component.
    pub fn handle(&mut self, event: Event) {
        debug!(event = event.name(), "handling event");
        match event {
            Event::ConfigLoaded(result) => self.config.on_loaded(result, &mut self.alerts),
            Event::ConfigSaved { submitted, result } => {
                self.config.on_saved(submitted, result, &mut self.alerts)
            }
            Event::StatsFetched(result) => {
                self.poller
                    .on_result(result, self.toggle.state(), &mut self.chart);
            }
            Event::StatsCleared(result) => match result {
                Ok(()) => {
                    self.alerts.success("Statistics cleared");
                    self.poller.fetch_now();
                }
                Err(err) => {
                    warn!(%err, "clear stats failed");
                    self.alerts.error("Failed to clear statistics");
                }
            },
            Event::ToggleFinished(result) => self.toggle.on_result(result, &mut self.alerts),
            Event::EngineStatus(result) => match result {
                Ok(status) => {
                    info!(running = status.running, uptime = %status.uptime, "engine status");
                    self.poller.display_mut().show_engine_status(&status);
                }
                Err(err) => {
                    warn!(%err, "status query failed");
                    self.alerts.error("Failed to query engine status");
                }
            },
            Event::AlertExpired(id) => {
                self.alerts.expire(id);
            }
        }
    }

    /// Last config loaded, saved or imported.
    pub fn config(&self) -> &Config {
        self.config.config()
    }

    pub fn edit_surface(&self) -> &dyn EditSurface {
        self.config.surface()
    }

    /// Direct access for front ends that edit fields through the core.
    pub fn edit_surface_mut(&mut self) -> &mut dyn EditSurface {
        self.config.surface_mut()
    }

    pub fn counters_mut(&mut self) -> &mut dyn CounterDisplay {
        self.poller.display_mut()
    }

    /// Most recent successful stats snapshot; empty before the first one.
    pub fn stats(&self) -> &StatsSnapshot {
        self.poller.snapshot()
    }

    /// Running state as the console believes it. Only a successful
    /// start or stop changes it.
    pub fn state(&self) -> SystemState {
        self.toggle.state()
    }

    /// Whether a start/stop request is in flight.
    pub fn toggle_pending(&self) -> bool {
        self.toggle.is_pending()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_polling()
    }

    pub fn chart(&self) -> &ChartBuffer {
        &self.chart
    }

    /// Alerts currently on screen.
    pub fn alerts(&self) -> &NotificationQueue {
        &self.alerts
    }
}
