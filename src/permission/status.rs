//! Resource and authorization state definitions
//!
//! Provides the two capture resources and the platform authorization
//! states, plus the mapping from raw platform status codes.

use serde::{Deserialize, Serialize};

use super::gate::PermissionError;

/// Raw platform status codes
pub mod codes {
    /// The user has not been asked yet
    pub const UNDETERMINED: i32 = 0;
    /// Access is restricted by policy (parental controls, MDM)
    pub const RESTRICTED: i32 = 1;
    /// The user denied access
    pub const DENIED: i32 = 2;
    /// The user granted access
    pub const GRANTED: i32 = 3;
}

/// A capture resource guarded by an OS permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Camera,
    Microphone,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Camera => write!(f, "camera"),
            Resource::Microphone => write!(f, "microphone"),
        }
    }
}

/// Authorization state of a single resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// Not yet asked; transitions exactly once
    #[default]
    Undetermined,
    Granted,
    Denied,
    Restricted,
}

impl PermissionState {
    /// Map a raw platform status code for `resource`
    pub fn from_code(resource: Resource, code: i32) -> Result<Self, PermissionError> {
        match code {
            codes::UNDETERMINED => Ok(Self::Undetermined),
            codes::RESTRICTED => Ok(Self::Restricted),
            codes::DENIED => Ok(Self::Denied),
            codes::GRANTED => Ok(Self::Granted),
            _ => Err(PermissionError::UnreachableState { resource, code }),
        }
    }

    /// The raw platform code for this state
    pub fn code(self) -> i32 {
        match self {
            Self::Undetermined => codes::UNDETERMINED,
            Self::Restricted => codes::RESTRICTED,
            Self::Denied => codes::DENIED,
            Self::Granted => codes::GRANTED,
        }
    }

    /// Whether the OS has already decided
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Undetermined)
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionState::Undetermined => write!(f, "undetermined"),
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Denied => write!(f, "denied"),
            PermissionState::Restricted => write!(f, "restricted"),
        }
    }
}

impl std::str::FromStr for PermissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "undetermined" => Ok(Self::Undetermined),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "restricted" => Ok(Self::Restricted),
            other => Err(format!("unknown permission state '{}'", other)),
        }
    }
}
