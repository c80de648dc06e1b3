//! Engine config held by the console and kept in step with the server and
//! the edit surface.
//!
//! The owned [`Config`] only ever changes to a value that was successfully
//! loaded, saved or imported. Failed requests leave it untouched.

use tracing::{debug, info, warn};

use crate::controller::{Dispatcher, Event};
use crate::error::BackendError;
use crate::models::Config;
use crate::notify::NotificationQueue;
use crate::ports::EditSurface;

pub struct ConfigSync {
    config: Config,
    surface: Box<dyn EditSurface>,
    dispatch: Dispatcher,
}

impl ConfigSync {
    pub fn new(surface: Box<dyn EditSurface>, dispatch: Dispatcher) -> Self {
        Self {
            config: Config::new(),
            surface,
            dispatch,
        }
    }

    /// The last loaded, saved or imported config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn surface(&self) -> &dyn EditSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn EditSurface {
        self.surface.as_mut()
    }

    /// Fetch the config from the server. No retry on failure.
    pub fn load(&self) {
        debug!("loading config");
        self.dispatch
            .request(|backend| async move { Event::ConfigLoaded(backend.fetch_config().await) });
    }

    /// Adopt a loaded config. Transport and decode failures raise an alert;
    /// an error status from the server does not.
    pub fn on_loaded(&mut self, result: Result<Config, BackendError>, alerts: &mut NotificationQueue) {
        match result {
            Ok(config) => {
                info!(options = config.len(), "config loaded");
                self.replace(config);
            }
            Err(err @ BackendError::Server { .. }) => {
                warn!(%err, "config load rejected by server");
            }
            Err(err) => {
                warn!(%err, "config load failed");
                alerts.error("Failed to load configuration");
            }
        }
    }

    /// Read the edit surface, coercing every field by its declared type.
    pub fn read_surface(&self) -> Config {
        self.surface
            .entries()
            .into_iter()
            .map(|(key, input)| (key, input.coerce()))
            .collect()
    }

    /// Submit whatever is on the edit surface as the new config.
    pub fn save(&self) {
        let edited = self.read_surface();
        self.submit(edited);
    }

    /// Submit `edited` as the new config.
    pub fn submit(&self, edited: Config) {
        debug!(options = edited.len(), "saving config");
        self.dispatch.request(move |backend| async move {
            let result = backend.submit_config(&edited).await;
            Event::ConfigSaved {
                submitted: edited,
                result,
            }
        });
    }

    pub fn on_saved(
        &mut self,
        submitted: Config,
        result: Result<(), BackendError>,
        alerts: &mut NotificationQueue,
    ) {
        match result {
            Ok(()) => {
                info!(options = submitted.len(), "config saved");
                self.config = submitted;
                alerts.success("Configuration saved successfully");
            }
            Err(err) => {
                warn!(%err, "config save failed");
                alerts.error("Failed to save configuration");
            }
        }
    }

    /// Adopt `config` wholesale and show it on the edit surface.
    pub fn replace(&mut self, config: Config) {
        self.config = config;
        self.push_to_surface();
    }

    /// Copy every config key onto the matching surface field.
    ///
    /// Surface fields without a config key keep their input. Returns the
    /// number of fields updated.
    pub fn push_to_surface(&mut self) -> usize {
        let mut updated = 0;
        for (key, value) in &self.config {
            if self.surface.set(key, value) {
                updated += 1;
            }
        }
        debug!(updated, total = self.config.len(), "config pushed to edit surface");
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;
    use crate::models::ConfigValue;
    use crate::ports::{FieldInput, FieldKind, FormSurface};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn sync_with(form: FormSurface) -> ConfigSync {
        let (tx, _rx) = mpsc::unbounded_channel();
        let dispatch = Dispatcher::new(Arc::new(SimulatedBackend::new()), tx);
        ConfigSync::new(Box::new(form), dispatch)
    }

    #[test]
    fn surface_reads_coerce_by_field_kind() {
        let mut form = FormSurface::new()
            .with_field("NumRXWorkers", FieldKind::Number)
            .with_field("TimeoutSec", FieldKind::Number)
            .with_field("DebugPrint", FieldKind::Flag)
            .with_field("Iface", FieldKind::Text);
        form.edit("NumRXWorkers", " 12 ").unwrap();
        form.edit("TimeoutSec", "").unwrap();
        form.edit("Iface", "eth0").unwrap();

        let config = sync_with(form).read_surface();
        assert_eq!(config.get("NumRXWorkers"), Some(&ConfigValue::Number(12.0)));
        assert_eq!(config.get("TimeoutSec"), Some(&ConfigValue::Number(0.0)));
        assert_eq!(config.get("DebugPrint"), Some(&ConfigValue::Bool(false)));
        assert_eq!(config.get("Iface"), Some(&ConfigValue::from("eth0")));
    }

    #[test]
    fn replace_fills_only_declared_fields() {
        let mut sync = sync_with(
            FormSurface::new()
                .with_field("Iface", FieldKind::Text)
                .with_field("Note", FieldKind::Text),
        );
        let mut config = Config::new();
        config.insert("Iface", "eth1");
        config.insert("NumRXWorkers", 3.0);

        sync.replace(config.clone());

        assert_eq!(sync.config(), &config);
        assert_eq!(sync.surface().get("Iface"), Some(FieldInput::Text("eth1".into())));
        assert_eq!(sync.surface().get("Note"), Some(FieldInput::Text(String::new())));
        assert_eq!(sync.push_to_surface(), 1);
    }
}
