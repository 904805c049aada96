//! Virtual vblank timing and atomic-commit synchronization.
//!
//! This crate is the temporal core of the mirage device: a periodic worker
//! that simulates a monitor's refresh cadence, signals each vertical-blank
//! boundary to the display framework, and releases pending commit-completion
//! tokens in lock-step with that cadence, exactly once per commit.
//!
//! The cadence is anchored to the enable instant: boundary `n` is scheduled
//! at `n * period`, never at "observed wake-up + period", so scheduler
//! jitter on individual fires does not accumulate into phase drift.

#![forbid(unsafe_code)]

mod engine;
mod period;
mod schedule;
mod signaler;

pub use engine::{EngineError, VblankEngine};
pub use period::{period_ns_from_hz, REFRESH_PERIOD, REFRESH_PERIOD_NS};
pub use signaler::CommitSignaler;
