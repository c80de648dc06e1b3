//! In-process stand-in for the clientgen web server.
//!
//! Behaves like the demo server: counters advance on every stats fetch while
//! the engine runs, start/stop are rejected when they would be no-ops, and the
//! config is whatever was last posted. Useful for trying the console without
//! capture hardware, and as the backend in tests.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use super::{endpoints, Backend};
use crate::error::BackendError;
use crate::models::{Config, EngineStatus, StatsSnapshot};

/// Per-fetch counter increments while running.
const RUNNING_INCREMENTS: [(&str, u64); 8] = [
    ("TotalPacketsSent", 100),
    ("TotalPacketsRcvd", 95),
    ("PFRingRXPackets", 95),
    ("PFRingTXPackets", 100),
    ("TotalSyncRcvd", 10),
    ("TotalAnnounceRcvd", 5),
    ("TotalDelayReqSent", 20),
    ("PFRingHWTimestamps", 50),
];

/// Clients reported once the engine starts.
const SIMULATED_CLIENTS: u64 = 1000;

#[derive(Debug, Default)]
struct SimState {
    config: Config,
    stats: StatsSnapshot,
    running: bool,
    offline: bool,
    requests: Vec<&'static str>,
}

/// Simulated engine server.
#[derive(Debug)]
pub struct SimulatedBackend {
    state: Mutex<SimState>,
    latency: Duration,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    /// Stopped engine with the default engine config.
    pub fn new() -> Self {
        Self::with_config(default_engine_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            state: Mutex::new(SimState {
                config,
                ..SimState::default()
            }),
            latency: Duration::ZERO,
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// While offline every request fails at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn config(&self) -> Config {
        self.state.lock().config.clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.state.lock().stats.clone()
    }

    /// Overwrite a counter.
    pub fn set_counter(&self, key: &str, value: u64) {
        self.state.lock().stats.set(key, value);
    }

    /// Endpoints requested so far, in order of arrival.
    pub fn requests(&self) -> Vec<&'static str> {
        self.state.lock().requests.clone()
    }

    /// Number of requests made to `endpoint`.
    pub fn request_count(&self, endpoint: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|e| **e == endpoint)
            .count()
    }

    /// Record the request, wait out the latency, then run `handler` on the
    /// state unless the server is offline.
    async fn serve<T>(
        &self,
        endpoint: &'static str,
        handler: impl FnOnce(&mut SimState) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        self.state.lock().requests.push(endpoint);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut state = self.state.lock();
        if state.offline {
            return Err(BackendError::transport(endpoint, "connection refused"));
        }
        handler(&mut state)
    }
}

fn rejected(endpoint: &str, body: &str) -> BackendError {
    BackendError::Server {
        endpoint: endpoint.to_string(),
        status: 400,
        body: body.to_string(),
    }
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn fetch_config(&self) -> Result<Config, BackendError> {
        self.serve(endpoints::CONFIG, |state| Ok(state.config.clone()))
            .await
    }

    async fn submit_config(&self, config: &Config) -> Result<(), BackendError> {
        let config = config.clone();
        self.serve(endpoints::CONFIG, move |state| {
            state.config = config;
            Ok(())
        })
        .await
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot, BackendError> {
        self.serve(endpoints::STATS, |state| {
            if state.running {
                for (key, by) in RUNNING_INCREMENTS {
                    state.stats.bump(key, by);
                }
            }
            Ok(state.stats.clone())
        })
        .await
    }

    async fn clear_stats(&self) -> Result<(), BackendError> {
        self.serve(endpoints::STATS_CLEAR, |state| {
            state.stats = StatsSnapshot::new();
            Ok(())
        })
        .await
    }

    async fn start(&self) -> Result<(), BackendError> {
        self.serve(endpoints::START, |state| {
            if state.running {
                return Err(rejected(endpoints::START, "System is already running"));
            }
            if state.config.is_empty() {
                return Err(rejected(endpoints::START, "No configuration available"));
            }
            state.running = true;
            state.stats.set("TotalClients", SIMULATED_CLIENTS);
            info!("simulated engine started");
            Ok(())
        })
        .await
    }

    async fn stop(&self) -> Result<(), BackendError> {
        self.serve(endpoints::STOP, |state| {
            if !state.running {
                return Err(rejected(endpoints::STOP, "System is not running"));
            }
            state.running = false;
            info!("simulated engine stopped");
            Ok(())
        })
        .await
    }

    async fn status(&self) -> Result<EngineStatus, BackendError> {
        self.serve(endpoints::STATUS, |state| {
            Ok(EngineStatus {
                running: state.running,
                uptime: chrono::Utc::now().to_rfc3339(),
            })
        })
        .await
    }
}

/// The engine's out-of-the-box configuration.
pub fn default_engine_config() -> Config {
    let mut config = Config::new();

    config.insert("Iface", "ens1f0np0");
    config.insert("ServerMAC", "0c:42:a1:80:31:66");
    config.insert("ServerAddress", "2401:db00:eef0:1120:3520:0:1401:eb11");
    config.insert("ClientIPStart", "2401:db00:eef0:1120:3520:0:1401:eb14");
    config.insert("ClientIPEnd", "2401:db00:eef0:1120:3520:0:1403:e6e4");
    config.insert("ClientIPStep", 1.0);
    config.insert("SoftStartRate", 1_000_000_000_000_000.0);

    config.insert("TimeoutSec", 90.0);
    config.insert("DurationSec", 5.0);
    config.insert("TimeAfterDurationBeforeRestartSec", 1.0);
    config.insert("TimeBetweenDelayReqSec", 1.0);
    config.insert("ClientRetranTimeWhenNoResponseSec", 1.0);

    config.insert("NumTXWorkers", 4.0);
    config.insert("NumTXTSWorkerPerTx", 3.0);
    config.insert("NumRXWorkers", 4.0);
    config.insert("NumPacketParsers", 4.0);
    config.insert("NumPacketProcessors", 4.0);
    config.insert("NumClientRetransmitProcs", 4.0);
    config.insert("NumClientRestartProcs", 4.0);
    config.insert("RestartClientsAfterDuration", true);

    for flag in [
        "DebugPrint",
        "DebugLogClient",
        "DebugIoWkrRX",
        "DebugIoWkrTX",
        "DebugDetailPerf",
        "DebugRestartProc",
        "DebugRetransProc",
        "DebugProfilers",
        "PrintClientReqData",
    ] {
        config.insert(flag, false);
    }
    for flag in [
        "PrintPerformance",
        "PrintClientData",
        "PrintTxRxCounts",
        "PrintLatencyData",
    ] {
        config.insert(flag, true);
    }
    config.insert("CounterPrintIntervalSecs", 1.0);

    config
}
