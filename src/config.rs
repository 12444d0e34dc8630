//! Configuration loading and management

use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::permission::{PermissionState, Resource};

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Name given to the pipeline worker thread
    pub worker_thread_name: String,

    /// Surface handle passed to the engine for video output
    pub render_target: u64,

    /// Settings for the simulated engine and OS used by the daemon binary
    pub simulation: SimulationConfig,
}

/// Behavior of the simulated collaborators
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// How long the simulated engine takes to become ready
    pub startup: Duration,

    /// Raw authorization code reported for the camera
    pub camera_code: i32,

    /// Raw authorization code reported for the microphone
    pub microphone_code: i32,

    /// Resources the simulated user grants when prompted
    pub grant: Vec<Resource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_thread_name: "pipeline-worker".to_string(),
            render_target: 0,
            simulation: SimulationConfig {
                startup: Duration::from_millis(250),
                camera_code: PermissionState::Undetermined.code(),
                microphone_code: PermissionState::Undetermined.code(),
                grant: vec![Resource::Camera, Resource::Microphone],
            },
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(name) = lookup("CAPTURE_WORKER_THREAD") {
            if name.trim().is_empty() {
                bail!("CAPTURE_WORKER_THREAD must not be empty");
            }
            config.worker_thread_name = name;
        }

        if let Some(raw) = lookup("CAPTURE_RENDER_TARGET") {
            config.render_target = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid CAPTURE_RENDER_TARGET '{}'", raw))?;
        }

        if let Some(raw) = lookup("CAPTURE_SIM_STARTUP_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid CAPTURE_SIM_STARTUP_MS '{}'", raw))?;
            config.simulation.startup = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("CAPTURE_SIM_CAMERA") {
            config.simulation.camera_code = parse_status(&raw)
                .with_context(|| format!("invalid CAPTURE_SIM_CAMERA '{}'", raw))?;
        }

        if let Some(raw) = lookup("CAPTURE_SIM_MICROPHONE") {
            config.simulation.microphone_code = parse_status(&raw)
                .with_context(|| format!("invalid CAPTURE_SIM_MICROPHONE '{}'", raw))?;
        }

        if let Some(raw) = lookup("CAPTURE_SIM_GRANT") {
            config.simulation.grant = parse_resources(&raw)
                .with_context(|| format!("invalid CAPTURE_SIM_GRANT '{}'", raw))?;
        }

        Ok(config)
    }
}

/// Accepts a state name or a raw platform code
fn parse_status(raw: &str) -> Result<i32> {
    if let Ok(code) = raw.trim().parse::<i32>() {
        return Ok(code);
    }
    let state: PermissionState = raw.parse().map_err(anyhow::Error::msg)?;
    Ok(state.code())
}

fn parse_resources(raw: &str) -> Result<Vec<Resource>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| -> Result<Resource> {
            match s.to_ascii_lowercase().as_str() {
                "camera" => Ok(Resource::Camera),
                "microphone" | "mic" => Ok(Resource::Microphone),
                other => bail!("unknown resource '{}'", other),
            }
        })
        .collect()
}
