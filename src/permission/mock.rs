//! Scriptable permission subsystem shared by unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::gate::{AccessCallback, PermissionAuthority};
use super::status::{codes, Resource};

pub(crate) type Journal = Arc<Mutex<Vec<&'static str>>>;

/// Authority that parks callbacks until the test resolves them
pub(crate) struct MockAuthority {
    codes: Mutex<HashMap<Resource, i32>>,
    pending: Mutex<Vec<(Resource, AccessCallback)>>,
    requests: Mutex<Vec<Resource>>,
    status_delay: Duration,
    journal: Option<Journal>,
}

impl MockAuthority {
    pub(crate) fn new(camera: i32, microphone: i32) -> Self {
        Self {
            codes: Mutex::new(HashMap::from([
                (Resource::Camera, camera),
                (Resource::Microphone, microphone),
            ])),
            pending: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            status_delay: Duration::ZERO,
            journal: None,
        }
    }

    pub(crate) fn with(camera: i32, microphone: i32) -> Arc<Self> {
        Arc::new(Self::new(camera, microphone))
    }

    /// Make every status query take `delay`
    pub(crate) fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    /// Append `"request"` to `journal` whenever access is requested
    pub(crate) fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Deliver the user's answer from an OS-owned thread
    pub(crate) fn resolve(&self, resource: Resource, granted: bool) {
        let callback = {
            let mut pending = self.pending.lock().unwrap();
            let idx = pending.iter().position(|(r, _)| *r == resource).unwrap();
            pending.remove(idx).1
        };
        let code = if granted { codes::GRANTED } else { codes::DENIED };
        self.codes.lock().unwrap().insert(resource, code);
        thread::spawn(move || callback(granted)).join().unwrap();
    }

    pub(crate) fn requests(&self) -> Vec<Resource> {
        self.requests.lock().unwrap().clone()
    }
}

impl PermissionAuthority for MockAuthority {
    fn authorization_status(&self, resource: Resource) -> i32 {
        if !self.status_delay.is_zero() {
            thread::sleep(self.status_delay);
        }
        self.codes.lock().unwrap()[&resource]
    }

    fn request_access(&self, resource: Resource, callback: AccessCallback) {
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push("request");
        }
        self.requests.lock().unwrap().push(resource);
        self.pending.lock().unwrap().push((resource, callback));
    }
}
