//! The single output pipeline: activation lifecycle and commit-event
//! queueing.

use std::sync::Arc;
use std::time::Duration;

use mirage_display::{CompletionSink, CompletionToken, VblankSink};
use mirage_timing::{EngineError, VblankEngine};
use thiserror::Error;
use tracing::debug;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Inactive,
    Active,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// `enable` was called on an already-active pipeline.
    #[error("output pipeline is already active")]
    AlreadyActive,
    #[error("vblank engine failed to start")]
    Engine(#[from] EngineError),
}

/// One virtual display path.
///
/// While active, the vblank engine simulates the refresh cadence; while
/// inactive no boundary is ever signalled and the vblank counter is frozen.
/// Dropping the pipeline disables it first, so no notification can outlive
/// the owner.
pub struct OutputPipeline {
    state: PipelineState,
    refresh_interval: Duration,
    engine: VblankEngine,
}

impl OutputPipeline {
    /// `refresh_interval` is device-wide and fixed for the pipeline's
    /// lifetime; it is never derived from the committed mode.
    pub fn new(
        refresh_interval: Duration,
        vblank_sink: Arc<dyn VblankSink>,
        completion_sink: Arc<dyn CompletionSink>,
    ) -> Self {
        Self {
            state: PipelineState::Inactive,
            refresh_interval,
            engine: VblankEngine::new(vblank_sink, completion_sink),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PipelineState::Active
    }

    /// Current vblank counter value. Monotonic for the pipeline's lifetime.
    pub fn vblank_sequence(&self) -> u64 {
        self.engine.sequence()
    }

    /// True if a commit-completion token is waiting for its boundary.
    pub fn has_pending_event(&self) -> bool {
        self.engine.has_pending_commit()
    }

    /// Queue a completion token for the next boundary. The pipeline may be
    /// inactive; the token is then released on the first boundary after the
    /// next [`enable`](Self::enable). Returns the displaced token if one was
    /// already queued.
    pub fn queue_event(&self, token: CompletionToken) -> Option<CompletionToken> {
        self.engine.submit(token)
    }

    /// Activate the pipeline and start the refresh simulation.
    ///
    /// Boundaries elapsed while inactive are not caught up: the first fire
    /// comes one full interval after activation.
    pub fn enable(&mut self) -> Result<(), PipelineError> {
        if self.is_active() {
            return Err(PipelineError::AlreadyActive);
        }
        self.engine.start(self.refresh_interval)?;
        self.state = PipelineState::Active;
        debug!("output pipeline activated");
        Ok(())
    }

    /// Deactivate the pipeline.
    ///
    /// Synchronous drain: returns only after any in-flight fire has fully
    /// completed, so the caller may tear down waiter state immediately
    /// afterwards. Disabling an inactive pipeline is a no-op.
    pub fn disable(&mut self) {
        if !self.is_active() {
            return;
        }
        self.engine.stop();
        self.state = PipelineState::Inactive;
        debug!(seq = self.vblank_sequence(), "output pipeline deactivated");
    }
}

impl Drop for OutputPipeline {
    fn drop(&mut self) {
        self.disable();
    }
}
