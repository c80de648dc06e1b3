//! Transient operator alerts.
//!
//! Every alert is shown as soon as it is raised and removed by its own timer
//! once the TTL has passed. Identical messages are not merged.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::controller::{Dispatcher, Event};
use crate::ports::AlertHost;

/// How long an alert stays up.
pub const ALERT_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertId(u64);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: AlertId,
    pub kind: AlertKind,
    pub message: String,
    pub created_at: Instant,
}

/// Visible alerts plus their expiry timers.
pub struct NotificationQueue {
    visible: Vec<Alert>,
    next_id: u64,
    ttl: Duration,
    host: Box<dyn AlertHost>,
    dispatch: Dispatcher,
}

impl NotificationQueue {
    pub fn new(host: Box<dyn AlertHost>, dispatch: Dispatcher, ttl: Duration) -> Self {
        Self {
            visible: Vec::new(),
            next_id: 0,
            ttl,
            host,
            dispatch,
        }
    }

    /// Show an alert now and schedule its removal `ttl` from now.
    pub fn raise(&mut self, kind: AlertKind, message: impl Into<String>) -> AlertId {
        let id = AlertId(self.next_id);
        self.next_id += 1;

        let alert = Alert {
            id,
            kind,
            message: message.into(),
            created_at: Instant::now(),
        };
        match kind {
            AlertKind::Success => tracing::info!(%id, message = %alert.message, "alert"),
            AlertKind::Error => tracing::warn!(%id, message = %alert.message, "alert"),
        }

        self.host.show(&alert);
        self.visible.push(alert);
        self.dispatch.schedule(self.ttl, Event::AlertExpired(id));
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> AlertId {
        self.raise(AlertKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> AlertId {
        self.raise(AlertKind::Error, message)
    }

    /// Expiry timer fired. Returns `false` if the alert was already gone.
    pub fn expire(&mut self, id: AlertId) -> bool {
        let Some(pos) = self.visible.iter().position(|a| a.id == id) else {
            return false;
        };
        self.visible.remove(pos);
        self.host.remove(id);
        true
    }

    /// Currently visible alerts, oldest first.
    pub fn visible(&self) -> &[Alert] {
        &self.visible
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct CountingHost {
        shown: Arc<parking_lot::Mutex<Vec<AlertId>>>,
    }

    impl AlertHost for CountingHost {
        fn show(&mut self, alert: &Alert) {
            self.shown.lock().push(alert.id);
        }

        fn remove(&mut self, id: AlertId) {
            self.shown.lock().retain(|a| *a != id);
        }
    }

    fn queue() -> (
        NotificationQueue,
        mpsc::UnboundedReceiver<Event>,
        Arc<parking_lot::Mutex<Vec<AlertId>>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let host = CountingHost::default();
        let shown = Arc::clone(&host.shown);
        let dispatch = Dispatcher::new(Arc::new(SimulatedBackend::new()), tx);
        (NotificationQueue::new(Box::new(host), dispatch, ALERT_TTL), rx, shown)
    }

    #[tokio::test(start_paused = true)]
    async fn alert_expires_after_ttl() {
        let (mut queue, mut rx, shown) = queue();

        let id = queue.success("Configuration saved");
        assert_eq!(queue.visible().len(), 1);
        assert_eq!(shown.lock().as_slice(), &[id]);

        let created = queue.visible()[0].created_at;
        let Some(Event::AlertExpired(expired)) = rx.recv().await else {
            panic!("expected expiry");
        };
        assert_eq!(expired, id);
        assert!(Instant::now() - created >= ALERT_TTL);

        assert!(queue.expire(expired));
        assert!(queue.visible().is_empty());
        assert!(shown.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn identical_messages_are_not_coalesced() {
        let (mut queue, _rx, _shown) = queue();

        let a = queue.error("System control failed");
        let b = queue.error("System control failed");

        assert_ne!(a, b);
        assert_eq!(queue.visible().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expiring_twice_is_harmless() {
        let (mut queue, _rx, _shown) = queue();
        let id = queue.success("ok");
        assert!(queue.expire(id));
        assert!(!queue.expire(id));
    }
}
