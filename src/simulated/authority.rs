//! Stand-in OS permission subsystem
//!
//! Answers prompts on its own thread after a short delay, the way a real
//! permission dialog resolves long after the request returned.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{error, info};

use crate::config::SimulationConfig;
use crate::permission::{AccessCallback, PermissionAuthority, PermissionState, Resource};

/// Permission subsystem with scripted user answers
pub struct SimulatedAuthority {
    codes: Arc<Mutex<HashMap<Resource, i32>>>,
    grant: Vec<Resource>,
    prompt_delay: Duration,
}

impl SimulatedAuthority {
    pub fn new(camera_code: i32, microphone_code: i32, grant: Vec<Resource>) -> Self {
        let codes = HashMap::from([
            (Resource::Camera, camera_code),
            (Resource::Microphone, microphone_code),
        ]);
        Self {
            codes: Arc::new(Mutex::new(codes)),
            grant,
            prompt_delay: Duration::from_millis(100),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.camera_code,
            config.microphone_code,
            config.grant.clone(),
        )
    }

    /// How long the simulated user takes to answer
    pub fn with_prompt_delay(mut self, delay: Duration) -> Self {
        self.prompt_delay = delay;
        self
    }
}

impl PermissionAuthority for SimulatedAuthority {
    fn authorization_status(&self, resource: Resource) -> i32 {
        let codes = self.codes.lock().unwrap_or_else(PoisonError::into_inner);
        codes
            .get(&resource)
            .copied()
            .unwrap_or(PermissionState::Undetermined.code())
    }

    fn request_access(&self, resource: Resource, callback: AccessCallback) {
        let granted = self.grant.contains(&resource);
        let codes = Arc::clone(&self.codes);
        let delay = self.prompt_delay;

        info!(%resource, "showing simulated permission prompt");
        let spawned = thread::Builder::new()
            .name(format!("{}-prompt", resource))
            .spawn(move || {
                thread::sleep(delay);
                let state = if granted {
                    PermissionState::Granted
                } else {
                    PermissionState::Denied
                };
                codes
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(resource, state.code());
                callback(granted);
            });

        if let Err(e) = spawned {
            error!(%resource, %e, "failed to spawn prompt thread");
        }
    }
}
