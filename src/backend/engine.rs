//! Pipeline engine collaborator interface

use std::sync::Arc;

use crate::events::EventSink;

/// Opaque handle to the surface the engine renders video into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTarget(u64);

impl RenderTarget {
    pub fn new(handle: u64) -> Self {
        Self(handle)
    }

    pub fn handle(&self) -> u64 {
        self.0
    }
}

/// Errors reported by an engine's startup routine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build pipeline: {0}")]
    Build(String),

    #[error("capture device unavailable: {0}")]
    Device(String),
}

/// A media capture-render engine
///
/// `run` blocks for the life of the pipeline and is only ever called on
/// the worker thread. `play` and `pause` may arrive from any thread,
/// including before `run` has reported readiness.
pub trait PipelineEngine: Send + Sync {
    fn run(&self) -> Result<(), EngineError>;

    fn play(&self);

    fn pause(&self);
}

/// Builds an engine bound to an event sink and render target
///
/// Construction must be cheap; expensive work belongs in [`PipelineEngine::run`].
pub trait EngineFactory: Send + Sync {
    fn create(&self, sink: EventSink, target: RenderTarget) -> Arc<dyn PipelineEngine>;
}

impl<F> EngineFactory for F
where
    F: Fn(EventSink, RenderTarget) -> Arc<dyn PipelineEngine> + Send + Sync,
{
    fn create(&self, sink: EventSink, target: RenderTarget) -> Arc<dyn PipelineEngine> {
        self(sink, target)
    }
}
