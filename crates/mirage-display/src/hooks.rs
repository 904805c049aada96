//! Contracts between the timing core and the surrounding display framework.
//!
//! The original ops-table style registration is replaced by trait objects
//! handed to the device at construction: the core calls *out* through
//! [`VblankSink`] and [`CompletionSink`], and nothing calls back in from a
//! foreign context.

/// A single simulated vertical-blank boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VblankStamp {
    /// Vblank sequence number. Monotonic for the lifetime of the pipeline:
    /// it freezes while the pipeline is inactive and continues (without
    /// catching up) on re-enable.
    pub seq: u64,
    /// Scheduled time of this boundary in nanoseconds since the current
    /// enable. This is the *scheduled* instant, not the observed wake-up
    /// time, so consecutive stamps always differ by exactly the nominal
    /// refresh period regardless of scheduler jitter.
    pub scheduled_ns: u64,
}

/// Opaque handle for a caller that asked to be notified when its commit
/// takes effect.
///
/// Deliberately not `Clone`: a token is delivered at most once, and moving
/// it into the completion sink consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct CompletionToken {
    id: u64,
}

impl CompletionToken {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Framework vblank accounting: called exactly once per simulated boundary
/// while the pipeline is active.
///
/// Implementations typically bump a counter and wake waiters. The call is
/// made from the timing engine's fire context and must be short and
/// non-blocking (in particular it must never wait on the vblank cadence
/// itself).
pub trait VblankSink: Send + Sync {
    fn vblank(&self, stamp: VblankStamp);
}

/// Framework event delivery for commit completions.
///
/// Called from the fire context with whatever stamp the releasing boundary
/// carries. Implementations own their event-lock discipline; if the original
/// requester is gone they must drop the token silently; they must not panic
/// or retry.
pub trait CompletionSink: Send + Sync {
    fn complete(&self, token: CompletionToken, at: VblankStamp);
}
