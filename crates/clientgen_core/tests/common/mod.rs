//! Shared fixtures for controller tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use clientgen_core::backend::{endpoints, Backend, SimulatedBackend};
use clientgen_core::chart::{ChartPoint, ChartStyle};
use clientgen_core::controller::ControllerOptions;
use clientgen_core::models::{
    Config, Counter, EngineStatus, StatsSnapshot, StatusIndicator, ToggleAffordance,
};
use clientgen_core::notify::{Alert, AlertId, AlertKind};
use clientgen_core::ports::{
    AlertHost, ArtifactSink, ChartSink, ChartSinkFactory, Confirm, CounterDisplay, FieldKind,
    FormSurface, Surfaces, ToggleControl,
};
use clientgen_core::{BackendError, Controller};

/// Everything the controller has pushed to the presentation ports.
#[derive(Debug, Default)]
pub struct Screen {
    pub counters: BTreeMap<Counter, String>,
    pub status: Option<StatusIndicator>,
    pub engine_status: Option<EngineStatus>,
    pub chart_builds: usize,
    pub chart_frames: Vec<Vec<ChartPoint>>,
    pub alerts: Vec<Alert>,
    pub removed_alerts: Vec<AlertId>,
    pub toggle_enabled: bool,
    pub toggle_busy: bool,
    pub toggle_affordance: Option<ToggleAffordance>,
    pub artifacts: Vec<(String, String)>,
}

impl Screen {
    pub fn alert_messages(&self) -> Vec<(AlertKind, String)> {
        self.alerts
            .iter()
            .map(|a| (a.kind, a.message.clone()))
            .collect()
    }
}

pub type SharedScreen = Arc<Mutex<Screen>>;

#[derive(Clone)]
struct ScreenPort(SharedScreen);

impl CounterDisplay for ScreenPort {
    fn show_counter(&mut self, counter: Counter, text: &str) {
        self.0.lock().counters.insert(counter, text.to_string());
    }

    fn show_status(&mut self, indicator: StatusIndicator) {
        self.0.lock().status = Some(indicator);
    }

    fn show_engine_status(&mut self, status: &EngineStatus) {
        self.0.lock().engine_status = Some(status.clone());
    }
}

impl ChartSinkFactory for ScreenPort {
    fn create(&mut self, _style: &ChartStyle) -> Box<dyn ChartSink> {
        self.0.lock().chart_builds += 1;
        Box::new(self.clone())
    }
}

impl ChartSink for ScreenPort {
    fn redraw(&mut self, points: &[ChartPoint]) {
        self.0.lock().chart_frames.push(points.to_vec());
    }
}

impl AlertHost for ScreenPort {
    fn show(&mut self, alert: &Alert) {
        self.0.lock().alerts.push(alert.clone());
    }

    fn remove(&mut self, id: AlertId) {
        let mut screen = self.0.lock();
        screen.alerts.retain(|a| a.id != id);
        screen.removed_alerts.push(id);
    }
}

impl ToggleControl for ScreenPort {
    fn set_enabled(&mut self, enabled: bool) {
        let mut screen = self.0.lock();
        screen.toggle_enabled = enabled;
        if enabled {
            screen.toggle_busy = false;
        }
    }

    fn show_busy(&mut self) {
        self.0.lock().toggle_busy = true;
    }

    fn show_affordance(&mut self, affordance: ToggleAffordance) {
        let mut screen = self.0.lock();
        screen.toggle_affordance = Some(affordance);
        screen.toggle_busy = false;
    }
}

impl ArtifactSink for ScreenPort {
    fn offer(&mut self, file_name: &str, contents: &str) -> io::Result<String> {
        self.0
            .lock()
            .artifacts
            .push((file_name.to_string(), contents.to_string()));
        Ok(format!("memory://{file_name}"))
    }
}

/// Confirmation that always gives the same answer and counts questions.
pub struct Answer {
    pub yes: bool,
    pub asked: usize,
}

impl Answer {
    pub fn yes() -> Self {
        Self { yes: true, asked: 0 }
    }

    pub fn no() -> Self {
        Self { yes: false, asked: 0 }
    }
}

#[async_trait]
impl Confirm for Answer {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        self.asked += 1;
        self.yes
    }
}

/// Edit surface with a few engine fields of each kind plus one field the
/// engine config does not have.
pub fn engine_form() -> FormSurface {
    FormSurface::new()
        .with_field("Iface", FieldKind::Text)
        .with_field("NumRXWorkers", FieldKind::Number)
        .with_field("TimeoutSec", FieldKind::Number)
        .with_field("DebugPrint", FieldKind::Flag)
        .with_field("PrintPerformance", FieldKind::Flag)
        .with_field("OperatorNote", FieldKind::Text)
}

pub struct Harness {
    pub controller: Controller,
    pub screen: SharedScreen,
    pub form: Arc<Mutex<FormSurface>>,
}

pub fn harness(backend: Arc<dyn Backend>) -> Harness {
    harness_with(backend, ControllerOptions::default())
}

pub fn harness_with(backend: Arc<dyn Backend>, options: ControllerOptions) -> Harness {
    clientgen_core::logging::init_test_tracing();

    let screen = SharedScreen::default();
    let form = Arc::new(Mutex::new(engine_form()));
    let port = ScreenPort(Arc::clone(&screen));

    let surfaces = Surfaces {
        edit: Box::new(Arc::clone(&form)),
        counters: Box::new(port.clone()),
        chart: Box::new(port.clone()),
        alerts: Box::new(port.clone()),
        toggle: Box::new(port.clone()),
        artifacts: Box::new(port),
    };

    Harness {
        controller: Controller::new(backend, surfaces, options),
        screen,
        form,
    }
}

/// Let spawned work run and apply whatever it reported.
pub async fn settle(controller: &mut Controller) -> usize {
    let mut applied = 0;
    for _ in 0..16 {
        tokio::task::yield_now().await;
        applied += controller.process_pending();
    }
    applied
}

/// Advance virtual time by `duration`, then settle.
pub async fn advance(controller: &mut Controller, duration: Duration) -> usize {
    tokio::time::sleep(duration).await;
    settle(controller).await
}

pub fn snapshot(sent: u64, received: u64) -> StatsSnapshot {
    [("TotalPacketsSent", sent), ("TotalPacketsRcvd", received)]
        .into_iter()
        .collect()
}

/// Backend whose stats responses follow a script of (latency, snapshot);
/// everything else, and stats once the script runs out, goes to a
/// [`SimulatedBackend`].
pub struct ScriptedBackend {
    pub inner: SimulatedBackend,
    stats: Mutex<VecDeque<(Duration, StatsSnapshot)>>,
    config_status: Mutex<Option<u16>>,
    panicking_fetches: Mutex<usize>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = (Duration, StatsSnapshot)>) -> Self {
        Self {
            inner: SimulatedBackend::new(),
            stats: Mutex::new(script.into_iter().collect()),
            config_status: Mutex::new(None),
            panicking_fetches: Mutex::new(0),
        }
    }

    /// Answer `GET /api/config` with `status` instead of the config.
    pub fn reject_config(self, status: u16) -> Self {
        *self.config_status.lock() = Some(status);
        self
    }

    /// Panic inside the next `count` stats fetches.
    pub fn panic_on_fetches(self, count: usize) -> Self {
        *self.panicking_fetches.lock() = count;
        self
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn fetch_config(&self) -> Result<Config, BackendError> {
        let rejected = *self.config_status.lock();
        match rejected {
            Some(status) => Err(BackendError::Server {
                endpoint: endpoints::CONFIG.to_string(),
                status,
                body: "internal error".to_string(),
            }),
            None => self.inner.fetch_config().await,
        }
    }

    async fn submit_config(&self, config: &Config) -> Result<(), BackendError> {
        self.inner.submit_config(config).await
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot, BackendError> {
        let panics = {
            let mut remaining = self.panicking_fetches.lock();
            let panics = *remaining > 0;
            *remaining = remaining.saturating_sub(1);
            panics
        };
        if panics {
            panic!("stats handler crashed");
        }

        let next = self.stats.lock().pop_front();
        match next {
            Some((latency, snapshot)) => {
                tokio::time::sleep(latency).await;
                Ok(snapshot)
            }
            None => self.inner.fetch_stats().await,
        }
    }

    async fn clear_stats(&self) -> Result<(), BackendError> {
        self.inner.clear_stats().await
    }

    async fn start(&self) -> Result<(), BackendError> {
        self.inner.start().await
    }

    async fn stop(&self) -> Result<(), BackendError> {
        self.inner.stop().await
    }

    async fn status(&self) -> Result<EngineStatus, BackendError> {
        self.inner.status().await
    }
}
