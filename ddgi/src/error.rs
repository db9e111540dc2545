use std::fmt;

use glam::UVec3;
use thiserror::Error;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Reason why a volume's configuration was rejected.
///
/// Whenever one of those is returned, the volume (if any) keeps its previous
/// configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("probe counts must be at least 1 on every axis, got {counts}")]
    InvalidProbeCounts { counts: UVec3 },

    #[error("probe counts must be at most {max} on every axis, got {counts}")]
    ProbeCountsOverflow { counts: UVec3, max: u32 },

    #[error("probe spacing on the {axis} axis must be positive, got {value}")]
    InvalidProbeSpacing { axis: Axis, value: f32 },

    #[error("scrolling volumes need non-zero spacing, got zero on {axis}")]
    ZeroScrollSpacing { axis: Axis },

    #[error("number of rays per probe must be within 1..={max}, got {value}")]
    InvalidRayCount { value: u32, max: u32 },

    #[error("number of {kind} texels must be within 1..={max}, got {value}")]
    InvalidTexelCount {
        kind: &'static str,
        value: u32,
        max: u32,
    },

    #[error("`{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("scrolling volumes cannot be rotated")]
    RotatedScrollingVolume,

    #[error("volume index must be at most {max}, got {index}")]
    InvalidVolumeIndex { index: u32, max: u32 },

    #[error("volume index {index} is already taken by `{name}`")]
    DuplicateVolumeIndex { index: u32, name: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    pub fn idx(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}
