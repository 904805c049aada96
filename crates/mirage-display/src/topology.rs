//! The fixed output graph of the virtual device.
//!
//! One primary plane feeds one display pipe, which drives one virtual
//! encoder, which is attached to one virtual connector. There is no
//! hot-plug: the graph is built once at device construction and never
//! changes, and the connector always reports as connected.

use crate::format::{PixelFormat, PRIMARY_PLANE_FORMATS};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaneKind {
    Primary,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncoderKind {
    Virtual,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectorKind {
    Virtual,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectorStatus {
    Connected,
}

/// A scan-out source. `possible_pipes` is a bitmask of pipe indices the
/// plane can feed.
#[derive(Clone, Debug)]
pub struct Plane {
    pub kind: PlaneKind,
    pub formats: &'static [PixelFormat],
    pub possible_pipes: u32,
}

/// One display pipeline unit (the part that runs the vblank simulation).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pipe {
    pub index: u8,
}

/// Signal converter between a pipe and a connector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Encoder {
    pub kind: EncoderKind,
    /// Bitmask of pipe indices this encoder can be driven by.
    pub possible_pipes: u32,
}

/// The output sink. `attached_encoders` is a bitmask of encoder indices the
/// connector is wired to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub status: ConnectorStatus,
    pub attached_encoders: u32,
}

/// The complete (and only) output path of the device.
#[derive(Clone, Debug)]
pub struct OutputTopology {
    pub plane: Plane,
    pub pipe: Pipe,
    pub encoder: Encoder,
    pub connector: Connector,
}

impl OutputTopology {
    /// Build the fixed single-output graph.
    pub fn single() -> Self {
        let pipe = Pipe { index: 0 };
        let pipe_mask = 1 << pipe.index;
        Self {
            plane: Plane {
                kind: PlaneKind::Primary,
                formats: PRIMARY_PLANE_FORMATS,
                possible_pipes: pipe_mask,
            },
            pipe,
            encoder: Encoder {
                kind: EncoderKind::Virtual,
                possible_pipes: pipe_mask,
            },
            connector: Connector {
                kind: ConnectorKind::Virtual,
                status: ConnectorStatus::Connected,
                attached_encoders: 1 << 0,
            },
        }
    }
}
