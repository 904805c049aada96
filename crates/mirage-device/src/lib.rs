//! The mirage virtual display device.
//!
//! Ties the static output description (`mirage-display`) to the timing core
//! (`mirage-timing`): device construction builds the fixed single-output
//! topology and mode list, and the atomic check/commit entry points drive
//! the output pipeline's enable/disable lifecycle and queue frame-completion
//! events for release at the simulated vblank.
//!
//! There is no module-level singleton: the embedding host constructs a
//! [`MirageDevice`], owns it, and drops it to tear everything down (the
//! pipeline is quiesced before the device is gone).

#![forbid(unsafe_code)]

mod atomic;
mod device;
mod driver;
mod pipeline;

pub use atomic::{CheckError, CommitRequest};
pub use device::{CommitError, DeviceConfig, MirageDevice};
pub use driver::{DriverFeatures, DriverInfo, DRIVER, FEATURES};
pub use pipeline::{OutputPipeline, PipelineError, PipelineState};
