//! Backend module wrapping the external pipeline engine
//!
//! The engine itself (graph wiring, codecs, rendering) lives outside this
//! crate. This module defines the seam it plugs into and the handle that
//! constructs it exactly once.

mod engine;
mod handle;

pub use engine::{EngineError, EngineFactory, PipelineEngine, RenderTarget};
pub use handle::{BackendError, BackendHandle};
