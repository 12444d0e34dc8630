//! Stand-in pipeline engine for running the daemon without media hardware

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::backend::{EngineError, EngineFactory, PipelineEngine, RenderTarget};
use crate::events::EventSink;

/// Engine that pretends to build a capture graph, then idles forever
pub struct SimulatedEngine {
    sink: EventSink,
    target: RenderTarget,
    startup: Duration,
    playing: AtomicBool,
}

impl SimulatedEngine {
    pub fn new(sink: EventSink, target: RenderTarget, startup: Duration) -> Self {
        Self {
            sink,
            target,
            startup,
            playing: AtomicBool::new(false),
        }
    }

    /// Whether the last transport command was play
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn set_playing(&self, playing: bool) {
        if self.playing.swap(playing, Ordering::SeqCst) != playing {
            let text = if playing { "playing" } else { "paused" };
            debug!(state = text, "simulated transport change");
            self.sink.on_message(format!("pipeline {}", text));
        }
    }
}

impl PipelineEngine for SimulatedEngine {
    fn run(&self) -> Result<(), EngineError> {
        info!(
            surface = self.target.handle(),
            startup_ms = self.startup.as_millis() as u64,
            "simulated engine starting"
        );
        self.sink
            .on_message(format!("building pipeline for surface {}", self.target.handle()));

        thread::sleep(self.startup);

        self.sink.on_initialized();
        self.sink.on_message("pipeline running");
        info!("simulated engine initialized");

        // Main loop stand-in; lives until the process exits
        loop {
            thread::park();
        }
    }

    fn play(&self) {
        self.set_playing(true);
    }

    fn pause(&self) {
        self.set_playing(false);
    }
}

/// Builds [`SimulatedEngine`]s with a fixed startup delay
pub struct SimulatedEngineFactory {
    startup: Duration,
}

impl SimulatedEngineFactory {
    pub fn new(startup: Duration) -> Self {
        Self { startup }
    }
}

impl EngineFactory for SimulatedEngineFactory {
    fn create(&self, sink: EventSink, target: RenderTarget) -> Arc<dyn PipelineEngine> {
        Arc::new(SimulatedEngine::new(sink, target, self.startup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BackendEvent;
    use crate::state;

    #[test]
    fn test_transport_reports_changes_only() {
        let (sink, mut projector) = state::channel();
        let engine = SimulatedEngine::new(sink, RenderTarget::new(3), Duration::ZERO);

        engine.play();
        engine.play();
        assert!(engine.is_playing());
        assert_eq!(projector.drain(), 1);
        assert_eq!(projector.state().last_message.as_deref(), Some("pipeline playing"));

        engine.pause();
        assert!(!engine.is_playing());
        projector.drain();
        assert_eq!(projector.state().last_message.as_deref(), Some("pipeline paused"));
    }

    #[test]
    fn test_run_reports_readiness() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let factory = SimulatedEngineFactory::new(Duration::from_millis(1));
        let engine = factory.create(EventSink::new(tx), RenderTarget::new(5));

        // run never returns; leave the thread parked
        thread::spawn(move || engine.run());

        let mut seen = Vec::new();
        while seen.len() < 3 {
            if let Some(event) = rx.blocking_recv() {
                seen.push(event);
            }
        }
        assert_eq!(
            seen,
            vec![
                BackendEvent::Message {
                    text: "building pipeline for surface 5".to_string()
                },
                BackendEvent::Initialized,
                BackendEvent::Message {
                    text: "pipeline running".to_string()
                },
            ]
        );
    }
}
