//! Lazily constructed, single-instance engine handle

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use super::engine::{EngineError, EngineFactory, PipelineEngine, RenderTarget};
use crate::events::EventSink;

/// Errors from forwarding to the engine
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("pipeline backend has not been constructed")]
    NotReady,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Owns the engine instance for one controller
///
/// The engine is built at most once, even when several threads race
/// on the first call. Once set it is never replaced.
pub struct BackendHandle {
    factory: Box<dyn EngineFactory>,
    engine: OnceLock<Arc<dyn PipelineEngine>>,
}

impl BackendHandle {
    pub fn new(factory: impl EngineFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            engine: OnceLock::new(),
        }
    }

    /// Return the engine, building it on first use
    pub fn get_or_create(&self, sink: EventSink, target: RenderTarget) -> Arc<dyn PipelineEngine> {
        let engine = self.engine.get_or_init(|| {
            info!(surface = target.handle(), "constructing pipeline engine");
            self.factory.create(sink, target)
        });
        Arc::clone(engine)
    }

    /// Whether the engine has been built
    pub fn is_ready(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Run the engine's startup routine; blocks for the life of the pipeline
    pub fn start_blocking(&self) -> Result<(), BackendError> {
        let engine = self.engine()?;
        info!("pipeline engine starting");
        engine.run()?;
        info!("pipeline engine returned");
        Ok(())
    }

    pub fn play(&self) -> Result<(), BackendError> {
        debug!("forwarding play");
        self.engine()?.play();
        Ok(())
    }

    pub fn pause(&self) -> Result<(), BackendError> {
        debug!("forwarding pause");
        self.engine()?.pause();
        Ok(())
    }

    fn engine(&self) -> Result<&Arc<dyn PipelineEngine>, BackendError> {
        self.engine.get().ok_or(BackendError::NotReady)
    }
}
