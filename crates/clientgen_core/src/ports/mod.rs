//! Boundaries between the core and whatever presents it.
//!
//! Each component talks to exactly one narrow port. A front end implements
//! the ones it can show and hands them to the controller at startup.

mod form;

pub use form::{FieldInput, FieldKind, FormSurface};

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::chart::{ChartPoint, ChartStyle};
use crate::models::{ConfigValue, Counter, EngineStatus, StatusIndicator, ToggleAffordance};
use crate::notify::{Alert, AlertId};

/// Key-value form the operator edits the engine config in.
pub trait EditSurface: Send {
    /// Current input of a field, `None` if the surface has no such field.
    fn get(&self, key: &str) -> Option<FieldInput>;

    /// Show `value` in the field named `key`.
    ///
    /// Returns `false` and changes nothing if the field does not exist.
    fn set(&mut self, key: &str, value: &ConfigValue) -> bool;

    /// Every field with its current input.
    fn entries(&self) -> Vec<(String, FieldInput)>;
}

impl<T: EditSurface> EditSurface for Arc<Mutex<T>> {
    fn get(&self, key: &str) -> Option<FieldInput> {
        self.lock().get(key)
    }

    fn set(&mut self, key: &str, value: &ConfigValue) -> bool {
        self.lock().set(key, value)
    }

    fn entries(&self) -> Vec<(String, FieldInput)> {
        self.lock().entries()
    }
}

/// Counter slots and the system status slot.
pub trait CounterDisplay: Send {
    fn show_counter(&mut self, counter: Counter, text: &str);

    fn show_status(&mut self, indicator: StatusIndicator);

    /// Result of an explicit engine status query.
    fn show_engine_status(&mut self, _status: &EngineStatus) {}
}

/// Something that draws the packet chart.
pub trait ChartSink: Send {
    /// Redraw with the full current window, oldest point first.
    fn redraw(&mut self, points: &[ChartPoint]);
}

/// Builds the chart sink the first time there is something to draw.
pub trait ChartSinkFactory: Send {
    fn create(&mut self, style: &ChartStyle) -> Box<dyn ChartSink>;
}

/// Where alerts are displayed.
pub trait AlertHost: Send {
    fn show(&mut self, alert: &Alert);

    fn remove(&mut self, id: AlertId);
}

/// The start/stop control.
pub trait ToggleControl: Send {
    fn set_enabled(&mut self, enabled: bool);

    /// Replace the label with a busy indicator while a request is out.
    fn show_busy(&mut self);

    fn show_affordance(&mut self, affordance: ToggleAffordance);
}

/// Asks the operator a yes/no question.
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, prompt: &str) -> bool;
}

/// Hands an exported document to the operator.
pub trait ArtifactSink: Send {
    /// Offer `contents` under `file_name`; returns where it ended up.
    fn offer(&mut self, file_name: &str, contents: &str) -> io::Result<String>;
}

/// All presentation ports, wired into the controller once.
pub struct Surfaces {
    pub edit: Box<dyn EditSurface>,
    pub counters: Box<dyn CounterDisplay>,
    pub chart: Box<dyn ChartSinkFactory>,
    pub alerts: Box<dyn AlertHost>,
    pub toggle: Box<dyn ToggleControl>,
    pub artifacts: Box<dyn ArtifactSink>,
}
