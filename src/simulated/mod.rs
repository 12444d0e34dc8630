//! Simulated collaborators for running the daemon on any host
//!
//! Real deployments plug a media engine and the platform permission
//! API into the same traits.

mod authority;
mod engine;

pub use authority::SimulatedAuthority;
pub use engine::{SimulatedEngine, SimulatedEngineFactory};
