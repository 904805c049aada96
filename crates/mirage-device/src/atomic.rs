//! Two-phase (check, then commit) state updates for the single output.

use mirage_display::{CompletionToken, DisplayMode, ModeConfigLimits};
use thiserror::Error;

/// A proposed atomic state update.
///
/// `None` fields leave the corresponding state untouched. The plane update
/// (`flip`) carries no pixel data (scan-out is simulated and frame contents
/// are never read), so applying it does nothing beyond the completion event.
#[derive(Debug, Default)]
pub struct CommitRequest {
    /// Requested pipeline activation state.
    pub active: Option<bool>,
    /// Requested display mode.
    pub mode: Option<DisplayMode>,
    /// Present a new frame on the primary plane.
    pub flip: bool,
    /// Token to release at the first vblank boundary after the commit.
    pub event: Option<CompletionToken>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("mode {width}x{height} is outside the mode-config limits")]
    ModeOutOfLimits { width: u32, height: u32 },
}

/// Validate a proposed update against the device's mode-config limits.
/// Pure; commits only happen through the device after a successful check.
pub(crate) fn check(req: &CommitRequest, limits: &ModeConfigLimits) -> Result<(), CheckError> {
    if let Some(mode) = req.mode {
        if !limits.contains(mode.width, mode.height) {
            return Err(CheckError::ModeOutOfLimits {
                width: mode.width,
                height: mode.height,
            });
        }
    }
    Ok(())
}
