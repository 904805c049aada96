//! Driver identity and advertised capabilities.

use bitflags::bitflags;

bitflags! {
    /// Capabilities advertised to the host framework.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DriverFeatures: u32 {
        /// The device can program display modes.
        const MODESET = 1 << 0;
        /// State updates go through the atomic check/commit protocol.
        const ATOMIC = 1 << 1;
    }
}

/// Identity record registered with the host framework.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub major: u32,
    pub minor: u32,
}

pub const DRIVER: DriverInfo = DriverInfo {
    name: "mirage",
    description: "Virtual display output",
    major: 1,
    minor: 0,
};

pub const FEATURES: DriverFeatures = DriverFeatures::MODESET.union(DriverFeatures::ATOMIC);
