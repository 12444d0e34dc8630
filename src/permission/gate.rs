//! Camera and microphone permission gate
//!
//! Checks the current authorization of each resource and fires the OS
//! request when the user has not been asked yet. Nothing here waits for
//! the answer: outcomes arrive later on whatever thread the OS picks and
//! are only logged and recorded for observers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info};

use super::status::{PermissionState, Resource};

/// Callback handed to the OS, invoked exactly once with the user's answer
pub type AccessCallback = Box<dyn FnOnce(bool) + Send + 'static>;

/// The OS permission subsystem
pub trait PermissionAuthority: Send + Sync {
    /// Current raw authorization code for `resource`
    fn authorization_status(&self, resource: Resource) -> i32;

    /// Ask the user for access; must return without waiting for the answer
    fn request_access(&self, resource: Resource, callback: AccessCallback);
}

/// Errors that can occur while checking permissions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("platform reported unknown {resource} authorization code {code}")]
    UnreachableState { resource: Resource, code: i32 },
}

/// Per-resource bookkeeping
struct Slot {
    requested: AtomicBool,
    state: watch::Sender<PermissionState>,
}

impl Slot {
    fn new() -> Arc<Self> {
        let (state, _) = watch::channel(PermissionState::Undetermined);
        Arc::new(Self {
            requested: AtomicBool::new(false),
            state,
        })
    }

    /// Record an observed state; a decided resource never goes back to Undetermined
    fn record(&self, next: PermissionState) {
        self.state.send_if_modified(|current| {
            if *current == next || (current.is_terminal() && !next.is_terminal()) {
                return false;
            }
            *current = next;
            true
        });
    }
}

/// Fire-and-forget permission requests for the capture resources
pub struct PermissionGate {
    authority: Arc<dyn PermissionAuthority>,
    camera: Arc<Slot>,
    microphone: Arc<Slot>,
}

impl PermissionGate {
    /// Create a gate backed by the given OS subsystem
    pub fn new(authority: Arc<dyn PermissionAuthority>) -> Self {
        Self {
            authority,
            camera: Slot::new(),
            microphone: Slot::new(),
        }
    }

    /// Check camera access, requesting it if undetermined
    pub fn ensure_camera_permission(&self) -> Result<PermissionState, PermissionError> {
        self.ensure(Resource::Camera)
    }

    /// Check microphone access, requesting it if undetermined
    pub fn ensure_microphone_permission(&self) -> Result<PermissionState, PermissionError> {
        self.ensure(Resource::Microphone)
    }

    /// Watch the last observed state of `resource`
    pub fn observe(&self, resource: Resource) -> watch::Receiver<PermissionState> {
        self.slot(resource).state.subscribe()
    }

    /// Last observed state of `resource`
    pub fn current(&self, resource: Resource) -> PermissionState {
        *self.slot(resource).state.borrow()
    }

    fn slot(&self, resource: Resource) -> &Arc<Slot> {
        match resource {
            Resource::Camera => &self.camera,
            Resource::Microphone => &self.microphone,
        }
    }

    fn ensure(&self, resource: Resource) -> Result<PermissionState, PermissionError> {
        let code = self.authority.authorization_status(resource);
        let state = PermissionState::from_code(resource, code).map_err(|e| {
            error!(%resource, code, "unknown authorization status, not requesting access");
            e
        })?;

        let slot = self.slot(resource);
        slot.record(state);

        match state {
            PermissionState::Undetermined => {
                if slot.requested.swap(true, Ordering::SeqCst) {
                    debug!(%resource, "access request already in flight");
                    return Ok(state);
                }

                info!(%resource, "requesting access");
                let slot = Arc::clone(slot);
                self.authority.request_access(
                    resource,
                    Box::new(move |granted| {
                        let outcome = if granted {
                            PermissionState::Granted
                        } else {
                            PermissionState::Denied
                        };
                        info!(%resource, %outcome, "access request resolved");
                        slot.record(outcome);
                    }),
                );
            }
            PermissionState::Granted => {
                debug!(%resource, "access already granted");
            }
            PermissionState::Denied | PermissionState::Restricted => {
                info!(%resource, %state, "access refused earlier, continuing without it");
            }
        }

        Ok(state)
    }
}
