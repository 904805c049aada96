//! In-process vblank accounting: latest-stamp publication plus bounded
//! waits for a target sequence number.
//!
//! This is the stand-in for the framework's "increment counter, wake
//! waiters" primitive. The device wires it in as its [`VblankSink`] and
//! anything that wants to pace itself against the simulated refresh (tests
//! included) blocks on [`VblankCounter::wait_for`].

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::hooks::{VblankSink, VblankStamp};

/// Shared vblank counter with condvar-based waiters.
#[derive(Debug, Default)]
pub struct VblankCounter {
    latest: Mutex<Option<VblankStamp>>,
    advanced: Condvar,
}

impl VblankCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published boundary, if any.
    pub fn latest(&self) -> Option<VblankStamp> {
        *self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current sequence number; 0 before the first boundary.
    pub fn sequence(&self) -> u64 {
        self.latest().map_or(0, |stamp| stamp.seq)
    }

    /// Block until a boundary with `seq >= target` has been published, or
    /// `timeout` elapses. Returns the first satisfying stamp, or `None` on
    /// timeout.
    pub fn wait_for(&self, target: u64, timeout: Duration) -> Option<VblankStamp> {
        let deadline = Instant::now() + timeout;
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(stamp) = *latest {
                if stamp.seq >= target {
                    return Some(stamp);
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .advanced
                .wait_timeout(latest, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            latest = guard;
        }
    }
}

impl VblankSink for VblankCounter {
    fn vblank(&self, stamp: VblankStamp) {
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *latest = Some(stamp);
        drop(latest);
        self.advanced.notify_all();
    }
}
