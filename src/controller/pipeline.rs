//! Pipeline startup orchestration
//!
//! Fires the permission requests, builds the backend once, and runs the
//! engine's blocking startup on a dedicated worker thread. The engine
//! reports back through the [`EventSink`] this controller hands it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, Once, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, BackendHandle, RenderTarget};
use crate::config::Config;
use crate::events::{EventSink, PipelineFailure};
use crate::permission::PermissionGate;

/// Lifecycle phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Nothing started yet
    Idle = 0,
    /// Permissions requested, backend being built
    Activating = 1,
    /// Worker dispatched
    Running = 2,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Phase::Idle,
            1 => Phase::Activating,
            _ => Phase::Running,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Activating => write!(f, "Activating"),
            Phase::Running => write!(f, "Running"),
        }
    }
}

/// Errors surfaced by transport commands
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Coordinates permissions, backend construction and the startup worker
pub struct PipelineController {
    gate: PermissionGate,
    backend: Arc<BackendHandle>,
    sink: EventSink,
    render_target: RenderTarget,
    worker_thread_name: String,
    activation: Once,
    phase: AtomicU8,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PipelineController {
    /// Create an idle controller; nothing is requested or built yet
    pub fn new(
        config: &Config,
        gate: PermissionGate,
        backend: BackendHandle,
        sink: EventSink,
        render_target: RenderTarget,
    ) -> Self {
        Self {
            gate,
            backend: Arc::new(backend),
            sink,
            render_target,
            worker_thread_name: config.worker_thread_name.clone(),
            activation: Once::new(),
            phase: AtomicU8::new(Phase::Idle as u8),
            worker: Mutex::new(None),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Whether the startup worker has been dispatched
    pub fn worker_spawned(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The permission gate, for observing request outcomes
    pub fn permissions(&self) -> &PermissionGate {
        &self.gate
    }

    /// Request permissions, build the backend and start it on the worker
    ///
    /// Only the first call does anything. Concurrent callers wait until the
    /// backend exists and the worker is dispatched; nobody waits on
    /// permission answers or engine startup.
    pub fn activate(&self) {
        if self.activation.is_completed() {
            debug!(phase = %self.phase(), "already activated");
            return;
        }
        self.activation.call_once(|| self.run_activation());
    }

    /// Start playback, activating first if needed
    pub fn play(&self) -> Result<(), ControllerError> {
        self.activate();
        self.backend.play()?;
        Ok(())
    }

    /// Pause playback; the backend must already exist
    pub fn pause(&self) -> Result<(), ControllerError> {
        self.backend.pause().map_err(|e| {
            warn!(%e, "pause issued before the pipeline was activated");
            e
        })?;
        Ok(())
    }

    fn run_activation(&self) {
        self.phase.store(Phase::Activating as u8, Ordering::SeqCst);
        info!("activating pipeline");

        // Requests fire before construction; denial is the engine's problem
        if let Err(e) = self.gate.ensure_camera_permission() {
            warn!(%e, "continuing without camera permission");
        }
        if let Err(e) = self.gate.ensure_microphone_permission() {
            warn!(%e, "continuing without microphone permission");
        }

        self.backend.get_or_create(self.sink.clone(), self.render_target);

        if self.spawn_worker() {
            self.phase.store(Phase::Running as u8, Ordering::SeqCst);
            info!("pipeline running");
        }
    }

    fn spawn_worker(&self) -> bool {
        let backend = Arc::clone(&self.backend);
        let sink = self.sink.clone();

        let spawned = thread::Builder::new()
            .name(self.worker_thread_name.clone())
            .spawn(move || {
                info!("pipeline worker started");

                match panic::catch_unwind(AssertUnwindSafe(|| backend.start_blocking())) {
                    Ok(Ok(())) => sink.on_terminated(),
                    Ok(Err(e)) => {
                        error!(%e, "pipeline startup failed");
                        sink.on_failed(PipelineFailure::Engine(e.to_string()));
                    }
                    Err(payload) => {
                        let msg = panic_message(&*payload);
                        error!(%msg, "pipeline startup panicked");
                        sink.on_failed(PipelineFailure::Panicked(msg));
                    }
                }

                info!("pipeline worker stopped");
            });

        match spawned {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                true
            }
            Err(e) => {
                error!(%e, "failed to spawn pipeline worker");
                self.sink.on_failed(PipelineFailure::WorkerSpawn(e.to_string()));
                false
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
