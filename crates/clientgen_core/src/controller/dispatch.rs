//! Spawning backend requests and timers whose results come back as events.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::events::Event;
use crate::backend::Backend;

/// Handle components use to start background work.
///
/// Work runs on its own task; only the resulting [`Event`] touches
/// controller state, and only once the controller receives it.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    events: mpsc::UnboundedSender<Event>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, events: mpsc::UnboundedSender<Event>) -> Self {
        Self { backend, events }
    }

    /// Run a backend request on its own task and post the event it yields.
    pub fn request<F, Fut>(&self, request: F) -> JoinHandle<()>
    where
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = Event> + Send + 'static,
    {
        let pending = request(Arc::clone(&self.backend));
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = pending.await;
            post(&events, event);
        })
    }

    /// Post `event` after `delay`.
    pub fn schedule(&self, delay: Duration, event: Event) -> JoinHandle<()> {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            post(&events, event);
        })
    }
}

fn post(events: &mpsc::UnboundedSender<Event>, event: Event) {
    if let Err(err) = events.send(event) {
        tracing::debug!(event = err.0.name(), "controller gone, dropping event");
    }
}
