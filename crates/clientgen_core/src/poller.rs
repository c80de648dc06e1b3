//! Fixed-cadence stats polling.
//!
//! A timer task issues one stats fetch per tick. Results come back as
//! [`Event::StatsFetched`] and are applied in arrival order; a failed fetch is
//! logged and skipped without an alert, and the next tick goes ahead on
//! schedule. Stopping the timer does not cancel fetches already issued.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::chart::{ChartBuffer, ChartPoint};
use crate::controller::{Dispatcher, Event};
use crate::error::BackendError;
use crate::models::{format_count, Counter, StatsSnapshot, SystemState};
use crate::ports::CounterDisplay;

/// Default time between fetches.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// What a tick does while an earlier fetch is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Issue another fetch anyway; responses may overtake each other.
    #[default]
    Allow,
    /// Wait for the outstanding fetch; ticks missed meanwhile collapse into
    /// a single catch-up fetch.
    Serialize,
}

pub struct StatsPoller {
    interval: Duration,
    overlap: OverlapPolicy,
    timer: Option<JoinHandle<()>>,
    snapshot: StatsSnapshot,
    display: Box<dyn CounterDisplay>,
    dispatch: Dispatcher,
}

impl StatsPoller {
    pub fn new(
        display: Box<dyn CounterDisplay>,
        dispatch: Dispatcher,
        interval: Duration,
        overlap: OverlapPolicy,
    ) -> Self {
        Self {
            interval,
            overlap,
            timer: None,
            snapshot: StatsSnapshot::new(),
            display,
            dispatch,
        }
    }

    /// Start ticking, replacing any timer already running.
    ///
    /// The first tick fires one interval from now.
    pub fn start(&mut self) {
        if let Some(previous) = self.timer.take() {
            previous.abort();
        }

        let dispatch = self.dispatch.clone();
        let period = self.interval;
        let overlap = self.overlap;

        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            if overlap == OverlapPolicy::Serialize {
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            }

            loop {
                ticker.tick().await;
                let fetch = fetch_stats(&dispatch);
                if overlap == OverlapPolicy::Serialize {
                    // The fetch runs on its own task, so aborting the timer
                    // while waiting here leaves it to finish and report.
                    if let Err(err) = fetch.await {
                        debug!(%err, "stats fetch task failed");
                    }
                }
            }
        }));

        info!(interval_ms = period.as_millis() as u64, ?overlap, "stats polling started");
    }

    /// Stop ticking. In-flight fetches still report.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            info!("stats polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_some()
    }

    /// One fetch outside the cadence.
    pub fn fetch_now(&self) {
        debug!("out-of-cycle stats fetch");
        fetch_stats(&self.dispatch);
    }

    /// Apply a fetch result: counters, status slot, then the chart.
    ///
    /// The status slot reflects `state`, not anything in the snapshot.
    /// Returns whether the result was applied.
    pub fn on_result(
        &mut self,
        result: Result<StatsSnapshot, BackendError>,
        state: SystemState,
        chart: &mut ChartBuffer,
    ) -> bool {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                debug!(%err, "stats fetch failed, skipping cycle");
                return false;
            }
        };

        for counter in Counter::ALL {
            self.display
                .show_counter(counter, &format_count(snapshot.counter(counter)));
        }
        self.display.show_status(state.indicator());
        chart.push(ChartPoint::from_snapshot(&snapshot));

        self.snapshot = snapshot;
        true
    }

    /// The last successfully fetched snapshot.
    pub fn snapshot(&self) -> &StatsSnapshot {
        &self.snapshot
    }

    pub fn display_mut(&mut self) -> &mut dyn CounterDisplay {
        self.display.as_mut()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn overlap(&self) -> OverlapPolicy {
        self.overlap
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn fetch_stats(dispatch: &Dispatcher) -> JoinHandle<()> {
    dispatch.request(|backend| async move { Event::StatsFetched(backend.fetch_stats().await) })
}
