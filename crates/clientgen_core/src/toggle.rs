//! Start/stop state machine for the engine.
//!
//! The state flips as soon as the server accepts the start or stop request;
//! it is not re-read from the server afterwards. While a request is out the
//! control is disabled and further toggles are ignored.

use tracing::{debug, info, warn};

use crate::controller::{Dispatcher, Event};
use crate::error::BackendError;
use crate::models::SystemState;
use crate::notify::NotificationQueue;
use crate::ports::ToggleControl;

pub struct SystemToggle {
    state: SystemState,
    pending: bool,
    control: Box<dyn ToggleControl>,
    dispatch: Dispatcher,
}

impl SystemToggle {
    pub fn new(mut control: Box<dyn ToggleControl>, dispatch: Dispatcher) -> Self {
        let state = SystemState::default();
        control.show_affordance(state.affordance());
        control.set_enabled(true);
        Self {
            state,
            pending: false,
            control,
            dispatch,
        }
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Whether a start/stop request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Ask the server to start a stopped engine or stop a running one.
    ///
    /// Returns `false` if a request is already outstanding.
    pub fn toggle(&mut self) -> bool {
        if self.pending {
            debug!("toggle ignored, request in flight");
            return false;
        }

        self.pending = true;
        self.control.set_enabled(false);
        self.control.show_busy();

        let target = self.state.toggled();
        debug!(?target, "requesting engine state change");
        self.dispatch.request(move |backend| async move {
            let result = match target {
                SystemState::Running => backend.start().await,
                SystemState::Stopped => backend.stop().await,
            };
            Event::ToggleFinished(result)
        });
        true
    }

    pub fn on_result(&mut self, result: Result<(), BackendError>, alerts: &mut NotificationQueue) {
        self.pending = false;

        match result {
            Ok(()) => {
                self.state = self.state.toggled();
                info!(state = ?self.state, "engine state changed");
                alerts.success(if self.state.is_running() {
                    "System started"
                } else {
                    "System stopped"
                });
            }
            Err(err) => {
                warn!(%err, state = ?self.state, "engine state change failed");
                alerts.error("System control failed");
            }
        }

        self.control.show_affordance(self.state.affordance());
        self.control.set_enabled(true);
    }
}
