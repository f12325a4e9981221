//! Progress notifications for a report run.
//!
//! The orchestrator reports through an injected [`ReportObserver`]; both
//! callbacks default to no-ops, so running without a listener is valid and
//! silent. [`ProgressObserver`] forwards events over a broadcast channel for
//! callers that consume progress asynchronously (the CLI prints from a
//! subscriber task).

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A single progress event emitted during a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum ProgressEvent {
    /// Human-readable status message.
    Status(String),
    /// Whether the caller may start another run.
    Enabled(bool),
}

/// Observer callbacks invoked synchronously by the orchestrator.
///
/// A run must not be re-entered while in flight; the
/// `on_enabled_changed(false)` / `on_enabled_changed(true)` pair brackets
/// every run so callers can gate their trigger.
pub trait ReportObserver: Send + Sync {
    /// Called with a human-readable status message before/after each phase.
    fn on_status(&self, _message: &str) {}

    /// Called when the caller's ability to start a run changes.
    fn on_enabled_changed(&self, _enabled: bool) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ReportObserver for NullObserver {}

/// Observer that forwards events to broadcast subscribers.
///
/// Sends are fire-and-forget: with no active subscriber the event is
/// dropped, which keeps the orchestrator oblivious to who is listening.
pub struct ProgressObserver {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Get a receiver for consuming progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportObserver for ProgressObserver {
    fn on_status(&self, message: &str) {
        let _ = self.sender.send(ProgressEvent::Status(message.to_string()));
    }

    fn on_enabled_changed(&self, enabled: bool) {
        let _ = self.sender.send(ProgressEvent::Enabled(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_observer_is_silent() {
        let observer = NullObserver;
        observer.on_status("anything");
        observer.on_enabled_changed(false);
    }

    #[test]
    fn test_broadcast_forwards_events() {
        let observer = ProgressObserver::new();
        let mut rx = observer.subscribe();

        observer.on_enabled_changed(false);
        observer.on_status("working");
        observer.on_enabled_changed(true);

        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::Enabled(false));
        assert_eq!(
            rx.try_recv().unwrap(),
            ProgressEvent::Status("working".into())
        );
        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::Enabled(true));
    }

    #[test]
    fn test_send_without_subscriber_is_dropped() {
        let observer = ProgressObserver::new();
        // No receiver; must not panic or error.
        observer.on_status("nobody listening");
    }
}
