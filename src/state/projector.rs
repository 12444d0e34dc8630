//! Observable pipeline state and its single writer
//!
//! [`StateProjector`] lives on the UI-affine context. It owns the receiving
//! half of the event channel and is the only code that mutates
//! [`ObservableState`]. Readers get snapshots through a watch channel.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::events::{BackendEvent, EventSink, PipelineFailure};

/// What the UI is allowed to see
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservableState {
    /// Engine reported readiness; never resets
    pub initialized: bool,

    /// Most recent engine message; earlier ones are not kept
    pub last_message: Option<String>,

    /// First failure seen on the worker, if any
    pub failure: Option<PipelineFailure>,
}

impl ObservableState {
    /// Fold one event into the state, returning whether anything changed
    pub fn apply(&mut self, event: BackendEvent) -> bool {
        match event {
            BackendEvent::Initialized => {
                if self.initialized {
                    return false;
                }
                self.initialized = true;
                true
            }
            BackendEvent::Message { text } => {
                if self.last_message.as_deref() == Some(text.as_str()) {
                    return false;
                }
                self.last_message = Some(text);
                true
            }
            BackendEvent::Failed { failure } => self.record_failure(failure),
            BackendEvent::Terminated => {
                if self.initialized {
                    return false;
                }
                self.record_failure(PipelineFailure::ExitedBeforeInit)
            }
        }
    }

    fn record_failure(&mut self, failure: PipelineFailure) -> bool {
        if let Some(existing) = &self.failure {
            debug!(%existing, ignored = %failure, "failure already recorded");
            return false;
        }
        warn!(%failure, "pipeline failed");
        self.failure = Some(failure);
        true
    }
}

/// Create a connected sink and projector
pub fn channel() -> (EventSink, StateProjector) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (EventSink::new(event_tx), StateProjector::new(event_rx))
}

/// Applies marshaled backend events on the UI-affine context
pub struct StateProjector {
    state: ObservableState,
    event_rx: mpsc::UnboundedReceiver<BackendEvent>,
    publish_tx: watch::Sender<ObservableState>,
}

impl StateProjector {
    fn new(event_rx: mpsc::UnboundedReceiver<BackendEvent>) -> Self {
        let (publish_tx, _) = watch::channel(ObservableState::default());
        Self {
            state: ObservableState::default(),
            event_rx,
            publish_tx,
        }
    }

    /// Current state
    pub fn state(&self) -> &ObservableState {
        &self.state
    }

    /// Receive a snapshot every time the state changes
    pub fn subscribe(&self) -> watch::Receiver<ObservableState> {
        self.publish_tx.subscribe()
    }

    /// Apply everything queued so far without waiting
    ///
    /// Meant for a cooperative UI tick. Returns the number of events applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        let mut changed = false;
        while let Ok(event) = self.event_rx.try_recv() {
            changed |= self.handle(event);
            applied += 1;
        }
        if changed {
            self.publish();
        }
        applied
    }

    /// Apply events as they arrive until every sink has been dropped
    pub async fn run(&mut self) {
        info!("state projector started");

        while let Some(event) = self.event_rx.recv().await {
            if self.handle(event) {
                self.publish();
            }
        }

        info!("state projector stopped");
    }

    fn handle(&mut self, event: BackendEvent) -> bool {
        debug!(%event, "applying backend event");
        self.state.apply(event)
    }

    fn publish(&self) {
        self.publish_tx.send_replace(self.state.clone());
    }
}
