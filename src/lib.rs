//! capture-coordinator: startup coordination for a capture-and-render pipeline
//!
//! Sits between a UI and an external media engine:
//! - Requests camera and microphone access without waiting on the answer
//! - Builds the engine exactly once and runs its blocking startup on a worker thread
//! - Marshals engine events onto the UI context, the only writer of observable state
//!
//! Out of scope: the engine's graph, codecs and rendering, and the UI itself.

pub mod backend;
pub mod config;
pub mod controller;
pub mod events;
pub mod lifecycle;
pub mod permission;
pub mod simulated;
pub mod state;

pub use backend::{BackendError, BackendHandle, EngineError, EngineFactory, PipelineEngine, RenderTarget};
pub use config::Config;
pub use controller::{ControllerError, Phase, PipelineController};
pub use events::{BackendEvent, EventSink, PipelineFailure};
pub use permission::{PermissionAuthority, PermissionError, PermissionGate, PermissionState, Resource};
pub use state::{ObservableState, StateProjector};
