//! Terminal rendering of the console ports.
//!
//! Every port writes into one shared [`Dashboard`]. Alerts and engine status
//! replies are printed the moment they arrive; counters and the chart are
//! printed on request.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use clientgen_core::chart::{ChartPoint, ChartStyle};
use clientgen_core::models::{Counter, EngineStatus, StatusIndicator, ToggleAffordance};
use clientgen_core::notify::{Alert, AlertId, AlertKind};
use clientgen_core::ports::{
    AlertHost, ArtifactSink, ChartSink, ChartSinkFactory, CounterDisplay, FieldInput,
    ToggleControl,
};

const BAR_WIDTH: usize = 30;

#[derive(Debug, Default)]
pub struct Dashboard {
    counters: BTreeMap<Counter, String>,
    status: Option<StatusIndicator>,
    chart: Option<Vec<ChartPoint>>,
    alerts: Vec<Alert>,
    toggle_enabled: bool,
    toggle_busy: bool,
    affordance: Option<ToggleAffordance>,
}

/// Cheap handle onto the shared dashboard; one clone per port.
#[derive(Clone, Default)]
pub struct ConsoleView {
    dashboard: Arc<Mutex<Dashboard>>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters, system status and the start/stop control.
    pub fn render_stats(&self) -> String {
        let dash = self.dashboard.lock();
        let mut out = String::new();

        if let Some(status) = dash.status {
            let _ = writeln!(out, "{:<22}{} {}", "System", status.glyph, status.label);
        }
        for counter in Counter::ALL {
            let value = dash.counters.get(&counter).map(String::as_str).unwrap_or("-");
            let _ = writeln!(out, "{:<22}{value}", counter.label());
        }
        let control = match (dash.toggle_busy, dash.affordance) {
            (true, _) => "working...".to_string(),
            (false, Some(affordance)) if dash.toggle_enabled => affordance.label.to_string(),
            (false, Some(affordance)) => format!("{} (disabled)", affordance.label),
            (false, None) => "-".to_string(),
        };
        let _ = write!(out, "{:<22}{control}", "Control");
        out
    }

    pub fn render_chart(&self) -> String {
        match &self.dashboard.lock().chart {
            Some(points) => render_points(points),
            None => "no samples yet".to_string(),
        }
    }

    pub fn render_alerts(&self) -> String {
        let dash = self.dashboard.lock();
        if dash.alerts.is_empty() {
            return "no alerts".to_string();
        }
        dash.alerts
            .iter()
            .map(alert_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One row per point: time, then sent and received with proportional bars.
pub fn render_points(points: &[ChartPoint]) -> String {
    let max = points
        .iter()
        .map(|p| p.values.0.max(p.values.1))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<10}{:>12} {:<w$} {:>12} {}",
        "time",
        "sent",
        "",
        "received",
        "",
        w = BAR_WIDTH
    );
    for point in points {
        let (sent, received) = point.values;
        let _ = write!(
            out,
            "\n{:<10}{:>12} {:<w$} {:>12} {}",
            point.label,
            sent,
            bar(sent, max, '#'),
            received,
            bar(received, max, '='),
            w = BAR_WIDTH
        );
    }
    out
}

fn bar(value: u64, max: u64, glyph: char) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    std::iter::repeat(glyph).take(len).collect()
}

fn alert_line(alert: &Alert) -> String {
    let tag = match alert.kind {
        AlertKind::Success => "ok",
        AlertKind::Error => "error",
    };
    format!("[{tag}] {}", alert.message)
}

/// Form fields as `key = value`, flags as `[x]` or `[ ]`.
pub fn render_form(entries: &[(String, FieldInput)]) -> String {
    let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(key, input)| {
            let value = match input {
                FieldInput::Flag(true) => "[x]",
                FieldInput::Flag(false) => "[ ]",
                FieldInput::Number(raw) | FieldInput::Text(raw) => raw.as_str(),
            };
            format!("{key:<width$} = {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl CounterDisplay for ConsoleView {
    fn show_counter(&mut self, counter: Counter, text: &str) {
        self.dashboard
            .lock()
            .counters
            .insert(counter, text.to_string());
    }

    fn show_status(&mut self, indicator: StatusIndicator) {
        self.dashboard.lock().status = Some(indicator);
    }

    fn show_engine_status(&mut self, status: &EngineStatus) {
        let state = if status.running { "running" } else { "stopped" };
        if status.uptime.is_empty() {
            println!("engine is {state}");
        } else {
            println!("engine is {state} (as of {})", status.uptime);
        }
    }
}

impl ChartSinkFactory for ConsoleView {
    fn create(&mut self, style: &ChartStyle) -> Box<dyn ChartSink> {
        let labels: Vec<_> = style.series.iter().map(|s| s.label).collect();
        debug!(series = ?labels, "chart created");
        self.dashboard.lock().chart = Some(Vec::new());
        Box::new(self.clone())
    }
}

impl ChartSink for ConsoleView {
    fn redraw(&mut self, points: &[ChartPoint]) {
        self.dashboard.lock().chart = Some(points.to_vec());
    }
}

impl AlertHost for ConsoleView {
    fn show(&mut self, alert: &Alert) {
        println!("{}", alert_line(alert));
        self.dashboard.lock().alerts.push(alert.clone());
    }

    fn remove(&mut self, id: AlertId) {
        self.dashboard.lock().alerts.retain(|a| a.id != id);
    }
}

impl ToggleControl for ConsoleView {
    fn set_enabled(&mut self, enabled: bool) {
        self.dashboard.lock().toggle_enabled = enabled;
    }

    fn show_busy(&mut self) {
        self.dashboard.lock().toggle_busy = true;
    }

    fn show_affordance(&mut self, affordance: ToggleAffordance) {
        let mut dash = self.dashboard.lock();
        dash.toggle_busy = false;
        dash.affordance = Some(affordance);
    }
}

/// Writes exported documents into a directory.
pub struct ExportDir {
    dir: PathBuf,
}

impl ExportDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for ExportDir {
    fn offer(&mut self, file_name: &str, contents: &str) -> io::Result<String> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)?;
        Ok(path.display().to_string())
    }
}
