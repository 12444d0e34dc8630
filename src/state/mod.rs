//! State module for the UI-visible pipeline projection
//!
//! Exposes two fields to the UI plus a failure indicator:
//! - initialized: engine reported readiness (monotonic)
//! - last_message: latest engine message (last write wins)
//! - failure: why startup did not succeed, if it did not

mod projector;

pub use crate::events::PipelineFailure;
pub use projector::{channel, ObservableState, StateProjector};
