//! Events module for backend-originated notifications
//!
//! The pipeline engine and the worker thread report through an
//! [`EventSink`]. Every event is marshaled over a channel to the
//! UI-affine context, which is the only place observable state changes.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Why the pipeline could not (or can no longer) run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PipelineFailure {
    /// The engine's startup routine returned an error
    Engine(String),
    /// The startup routine panicked on the worker thread
    Panicked(String),
    /// The worker thread could not be spawned
    WorkerSpawn(String),
    /// The startup routine returned before the engine reported readiness
    ExitedBeforeInit,
}

impl std::fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineFailure::Engine(msg) => write!(f, "engine error: {}", msg),
            PipelineFailure::Panicked(msg) => write!(f, "engine panicked: {}", msg),
            PipelineFailure::WorkerSpawn(msg) => write!(f, "worker spawn failed: {}", msg),
            PipelineFailure::ExitedBeforeInit => write!(f, "engine exited before initializing"),
        }
    }
}

/// Events delivered from the backend to the UI-affine context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendEvent {
    /// Engine finished its internal startup
    Initialized,

    /// Status text for the UI
    Message { text: String },

    /// Startup failed on the worker
    Failed { failure: PipelineFailure },

    /// Startup routine returned normally
    Terminated,
}

impl std::fmt::Display for BackendEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendEvent::Initialized => write!(f, "INITIALIZED"),
            BackendEvent::Message { text } => write!(f, "MESSAGE ({})", text),
            BackendEvent::Failed { failure } => write!(f, "FAILED ({})", failure),
            BackendEvent::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// Callback surface handed to the engine
///
/// Safe to call from any thread; never blocks.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<BackendEvent>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<BackendEvent>) -> Self {
        Self { tx }
    }

    /// The engine is ready
    pub fn on_initialized(&self) {
        self.emit(BackendEvent::Initialized);
    }

    /// The engine has a message for the UI
    pub fn on_message(&self, text: impl Into<String>) {
        self.emit(BackendEvent::Message { text: text.into() });
    }

    /// The pipeline failed to start or stopped abnormally
    pub fn on_failed(&self, failure: PipelineFailure) {
        self.emit(BackendEvent::Failed { failure });
    }

    /// The startup routine returned
    pub fn on_terminated(&self) {
        self.emit(BackendEvent::Terminated);
    }

    fn emit(&self, event: BackendEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!(event = %e.0, "UI context gone, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = BackendEvent::Message {
            text: "pipeline running".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"message\""));
        assert!(json.contains("pipeline running"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"initialized"}"#;
        let event: BackendEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, BackendEvent::Initialized);

        let json = r#"{"type":"failed","failure":{"kind":"engine","detail":"no device"}}"#;
        let event: BackendEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            BackendEvent::Failed {
                failure: PipelineFailure::Engine("no device".to_string())
            }
        );
    }

    #[test]
    fn test_sink_preserves_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(tx);

        sink.on_initialized();
        sink.on_message("a");
        sink.on_terminated();

        assert_eq!(rx.try_recv().unwrap(), BackendEvent::Initialized);
        assert_eq!(
            rx.try_recv().unwrap(),
            BackendEvent::Message {
                text: "a".to_string()
            }
        );
        assert_eq!(rx.try_recv().unwrap(), BackendEvent::Terminated);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sink_survives_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(tx);
        drop(rx);

        sink.on_message("nobody listening");
        sink.on_initialized();
    }
}
