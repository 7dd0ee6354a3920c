//! Notification Channel for LearnHub.
//!
//! One-shot messages flow from the client core to whatever presents them:
//! toast-style notices when a flow completes, and navigation requests such as
//! "go to the login screen" after the session was rejected.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// A user-facing message produced when a flow finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Navigation targets the core may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Notice(Notice),
    Navigate(Route),
}

/// Sending half, cloned into every component that reports outcomes.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: UnboundedSender<ClientEvent>,
}

/// Receiving half, owned by the presentation layer.
#[derive(Debug)]
pub struct EventReceiver {
    rx: UnboundedReceiver<ClientEvent>,
}

impl EventChannel {
    /// Creates a connected sender and receiver pair.
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, EventReceiver { rx })
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(ClientEvent::Notice(Notice::Success(message.into())));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(ClientEvent::Notice(Notice::Error(message.into())));
    }

    pub fn navigate(&self, route: Route) {
        self.emit(ClientEvent::Navigate(route));
    }

    fn emit(&self, event: ClientEvent) {
        if self.tx.send(event).is_err() {
            debug!("event receiver dropped, discarding event");
        }
    }
}

impl EventReceiver {
    /// Waits for the next event. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<ClientEvent> {
        self.rx.recv().await
    }

    /// Takes every event queued so far without waiting.
    pub fn drain(&mut self) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
