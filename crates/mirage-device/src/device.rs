//! Device construction and the atomic entry points.

use std::sync::Arc;
use std::time::Duration;

use mirage_display::{
    probe_modes, CompletionSink, DisplayMode, ModeConfigLimits, OutputTopology, VblankSink,
};
use mirage_timing::REFRESH_PERIOD;
use thiserror::Error;
use tracing::debug;

use crate::atomic::{self, CheckError, CommitRequest};
use crate::driver::{DriverFeatures, DriverInfo, DRIVER, FEATURES};
use crate::pipeline::{OutputPipeline, PipelineError};

/// Construction parameters.
#[derive(Copy, Clone, Debug)]
pub struct DeviceConfig {
    /// Simulated refresh period. Device-wide; never derived from the
    /// committed mode. Defaults to the fixed ~60 Hz period.
    pub refresh_interval: Duration,
    pub limits: ModeConfigLimits,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            refresh_interval: REFRESH_PERIOD,
            limits: ModeConfigLimits::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// The virtual display device: fixed single-output topology plus the timing
/// core.
///
/// Owned by the embedding host. Dropping the device quiesces the pipeline
/// (vblank worker joined) before any state goes away.
pub struct MirageDevice {
    driver: DriverInfo,
    features: DriverFeatures,
    limits: ModeConfigLimits,
    topology: OutputTopology,
    modes: Vec<DisplayMode>,
    current_mode: Option<DisplayMode>,
    pipeline: OutputPipeline,
}

impl MirageDevice {
    /// Build the device: fixed output graph, probed mode list, inactive
    /// pipeline wired to the framework's sinks.
    pub fn new(
        config: DeviceConfig,
        vblank_sink: Arc<dyn VblankSink>,
        completion_sink: Arc<dyn CompletionSink>,
    ) -> Self {
        let topology = OutputTopology::single();
        let modes = probe_modes(&config.limits);
        let pipeline = OutputPipeline::new(config.refresh_interval, vblank_sink, completion_sink);

        debug!(
            modes = modes.len(),
            "virtual display device initialized"
        );

        Self {
            driver: DRIVER,
            features: FEATURES,
            limits: config.limits,
            topology,
            modes,
            current_mode: None,
            pipeline,
        }
    }

    pub fn driver(&self) -> DriverInfo {
        self.driver
    }

    pub fn features(&self) -> DriverFeatures {
        self.features
    }

    pub fn topology(&self) -> &OutputTopology {
        &self.topology
    }

    pub fn modes(&self) -> &[DisplayMode] {
        &self.modes
    }

    pub fn preferred_mode(&self) -> Option<DisplayMode> {
        self.modes.iter().copied().find(|m| m.preferred)
    }

    pub fn current_mode(&self) -> Option<DisplayMode> {
        self.current_mode
    }

    pub fn pipeline(&self) -> &OutputPipeline {
        &self.pipeline
    }

    /// Validate a proposed state update without applying anything.
    pub fn atomic_check(&self, req: &CommitRequest) -> Result<(), CheckError> {
        atomic::check(req, &self.limits)
    }

    /// Validate and apply a state update.
    ///
    /// Activation transitions drive the pipeline lifecycle (disable drains
    /// synchronously). The plane update itself is a no-op: no frame content
    /// is read or written. A request that carries an event has its token
    /// queued for the first boundary after this commit.
    pub fn atomic_commit(&mut self, req: CommitRequest) -> Result<(), CommitError> {
        self.atomic_check(&req)?;

        if let Some(mode) = req.mode {
            self.current_mode = Some(mode);
        }

        match req.active {
            // Committing active=true on an already-active pipeline is not a
            // transition; only Inactive -> Active starts the engine.
            Some(true) if !self.pipeline.is_active() => self.pipeline.enable()?,
            Some(false) => self.pipeline.disable(),
            _ => {}
        }

        if let Some(token) = req.event {
            // Displaced tokens are logged by the signaler; the serialization
            // layer above is expected to never let that happen.
            let _ = self.pipeline.queue_event(token);
        }

        Ok(())
    }
}
