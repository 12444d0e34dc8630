//! Daemon stop trigger
//!
//! The engine's blocking loop has no cancellation, so stopping is process
//! teardown. The daemon's main task only needs to know when to stop pumping
//! backend events and pause the pipeline.

use std::io;

use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

/// Resolves when the daemon is asked to stop (SIGTERM or SIGINT)
pub struct ShutdownSignal;

impl ShutdownSignal {
    pub fn new() -> Self {
        Self
    }

    /// Wait until either stop signal arrives
    ///
    /// Fails only if the signal handlers cannot be installed.
    pub async fn wait(&self) -> io::Result<()> {
        let mut terminate = signal(SignalKind::terminate())?;
        let mut interrupt = signal(SignalKind::interrupt())?;

        let name = tokio::select! {
            _ = terminate.recv() => "SIGTERM",
            _ = interrupt.recv() => "SIGINT",
        };
        debug!(signal = name, "stop requested");

        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
