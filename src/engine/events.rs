use tokio::sync::mpsc;
use tracing::debug;

/// Notifications emitted during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Free-text status while the run is in progress
    Progress(String),
    /// Terminal success with the formatted report
    Complete { data: String, count: usize },
    /// Terminal failure
    Failed(String),
}

impl EngineEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Sending half of the notification channel
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EventSink {
    /// Create a sink and the receiver the caller listens on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn progress(&self, message: impl Into<String>) {
        self.send(EngineEvent::Progress(message.into()));
    }

    pub fn complete(&self, data: String, count: usize) {
        self.send(EngineEvent::Complete { data, count });
    }

    pub fn failed(&self, message: impl Into<String>) {
        self.send(EngineEvent::Failed(message.into()));
    }

    fn send(&self, event: EngineEvent) {
        // Nobody listening is fine; the run still returns its outcome.
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}
