//! capture-coordinator daemon
//!
//! Runs the coordinator against the simulated engine and permission
//! subsystem:
//! - The main task plays the UI-affine context and owns observable state
//! - Permission prompts resolve on their own threads
//! - The engine starts on a dedicated worker thread
//!
//! Configure through CAPTURE_* environment variables; stop with SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use capture_coordinator::config::Config;
use capture_coordinator::lifecycle::ShutdownSignal;
use capture_coordinator::simulated::{SimulatedAuthority, SimulatedEngineFactory};
use capture_coordinator::state::{self, ObservableState};
use capture_coordinator::{BackendHandle, PermissionGate, PipelineController, RenderTarget, Resource};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "capture-coordinator starting"
    );

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;
    info!(?config, "configuration loaded");

    let shutdown = ShutdownSignal::new();

    let authority = SimulatedAuthority::from_config(&config.simulation);
    let gate = PermissionGate::new(Arc::new(authority));
    let backend = BackendHandle::new(SimulatedEngineFactory::new(config.simulation.startup));

    // Worker and OS callbacks -> UI context
    let (sink, mut projector) = state::channel();

    let controller = PipelineController::new(
        &config,
        gate,
        backend,
        sink,
        RenderTarget::new(config.render_target),
    );

    let mut camera = controller.permissions().observe(Resource::Camera);
    let mut microphone = controller.permissions().observe(Resource::Microphone);
    let mut updates = projector.subscribe();

    // First play activates lazily
    controller.play().context("failed to start playback")?;
    info!(phase = %controller.phase(), "playback requested");

    tokio::select! {
        // Apply marshaled backend events
        _ = projector.run() => {
            info!("backend event stream closed");
        }

        // Report published state
        _ = async {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                log_snapshot(&snapshot);
            }
        } => {}

        // Report permission outcomes
        _ = async {
            loop {
                tokio::select! {
                    Ok(()) = camera.changed() => {
                        let state = *camera.borrow_and_update();
                        info!(%state, "camera permission");
                    }
                    Ok(()) = microphone.changed() => {
                        let state = *microphone.borrow_and_update();
                        info!(%state, "microphone permission");
                    }
                    else => break,
                }
            }
        } => {}

        // Wait for shutdown signal
        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "failed to listen for shutdown signals"),
            }
        }
    }

    info!("shutting down...");

    if let Err(e) = controller.pause() {
        warn!(%e, "could not pause pipeline");
    }
    projector.drain();
    log_snapshot(projector.state());

    info!("capture-coordinator stopped");

    Ok(())
}

fn log_snapshot(state: &ObservableState) {
    match serde_json::to_string(state) {
        Ok(json) => info!(state = %json, "pipeline state"),
        Err(e) => warn!(?e, "failed to encode pipeline state"),
    }
}
