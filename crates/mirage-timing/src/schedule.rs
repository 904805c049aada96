//! Drift-free fire scheduling.

use std::time::{Duration, Instant};

/// Deadline arithmetic for a periodic fire, anchored to its enable instant.
///
/// Boundary `n` (1-based) is due at `base + n * period`. Rearming after a
/// fire advances `n` instead of re-reading the clock, so a late wake-up only
/// delays that one fire: every subsequent deadline stays on the nominal
/// grid and consecutive scheduled times differ by exactly one period.
#[derive(Debug)]
pub(crate) struct FireSchedule {
    base: Instant,
    period_ns: u64,
    fired: u64,
}

impl FireSchedule {
    pub(crate) fn new(base: Instant, period: Duration) -> Self {
        Self {
            base,
            period_ns: period.as_nanos().min(u128::from(u64::MAX)) as u64,
            fired: 0,
        }
    }

    /// Scheduled offset (ns since `base`) of the next, not yet fired,
    /// boundary.
    pub(crate) fn next_offset_ns(&self) -> u64 {
        (self.fired + 1).saturating_mul(self.period_ns)
    }

    /// Deadline of the next boundary.
    pub(crate) fn next_deadline(&self) -> Instant {
        self.base + Duration::from_nanos(self.next_offset_ns())
    }

    /// Record that the next boundary fired; returns its scheduled offset in
    /// nanoseconds since `base`.
    pub(crate) fn mark_fired(&mut self) -> u64 {
        let offset = self.next_offset_ns();
        self.fired += 1;
        offset
    }
}
