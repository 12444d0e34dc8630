//! Controller module for pipeline startup
//!
//! Drives the `Idle -> Activating -> Running` lifecycle and owns the
//! worker thread that runs the engine's blocking startup.

mod pipeline;

pub use pipeline::{ControllerError, Phase, PipelineController};
