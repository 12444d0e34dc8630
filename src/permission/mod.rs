//! Permission module for capture resource authorization
//!
//! Wraps the OS permission subsystem behind [`PermissionAuthority`] and
//! exposes a non-blocking check-or-request per resource:
//! - Camera: video capture
//! - Microphone: audio capture

mod gate;
#[cfg(test)]
pub(crate) mod mock;
mod status;

pub use gate::{AccessCallback, PermissionAuthority, PermissionError, PermissionGate};
pub use status::{codes, PermissionState, Resource};
