//! Refresh-cadence arithmetic.

use std::time::Duration;

/// Simulated refresh period: 16,666,667 ns, ~60 Hz.
///
/// This is fixed for the whole device. It deliberately does not track the
/// negotiated display mode's refresh field; the simulation runs at the same
/// cadence whatever mode is committed.
pub const REFRESH_PERIOD_NS: u64 = 16_666_667;

/// [`REFRESH_PERIOD_NS`] as a [`Duration`].
pub const REFRESH_PERIOD: Duration = Duration::from_nanos(REFRESH_PERIOD_NS);

/// Convert a refresh rate in Hz into a period in nanoseconds.
///
/// Returns `None` for 0 Hz. Ceiling division keeps 60 Hz at 16_666_667 ns
/// rather than truncating to 16_666_666.
pub fn period_ns_from_hz(hz: u32) -> Option<u64> {
    if hz == 0 {
        return None;
    }
    Some(1_000_000_000u64.div_ceil(u64::from(hz)))
}
