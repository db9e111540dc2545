use glam::{uvec3, UVec3};

/// Handedness and up-axis convention of the host renderer.
///
/// Probe addressing, the layout of probes inside the volume's textures and
/// the order in which Euler angles are applied all depend on it, so it has
/// to match whatever the shaders were compiled against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// Left-handed, Y-up.
    Left,

    /// Left-handed, Z-up.
    LeftZUp,

    /// Right-handed, Y-up.
    Right,

    /// Right-handed, Z-up.
    #[default]
    RightZUp,
}

impl CoordinateSystem {
    pub const ALL: [Self; 4] =
        [Self::Left, Self::LeftZUp, Self::Right, Self::RightZUp];

    pub fn is_z_up(self) -> bool {
        matches!(self, Self::LeftZUp | Self::RightZUp)
    }

    pub fn is_left_handed(self) -> bool {
        matches!(self, Self::Left | Self::LeftZUp)
    }

    /// Rearranges world-space probe counts into texture-space ones: `x` is
    /// the number of probes per texture row, `y` per texture column and `z`
    /// is the number of texture array slices.
    ///
    /// Probes along the up-axis always land in separate slices.
    pub fn texture_probe_counts(self, counts: UVec3) -> UVec3 {
        match self {
            Self::Left | Self::Right => uvec3(counts.x, counts.z, counts.y),
            Self::LeftZUp => uvec3(counts.y, counts.x, counts.z),
            Self::RightZUp => counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_probe_counts() {
        let counts = uvec3(2, 3, 4);

        assert_eq!(
            uvec3(2, 4, 3),
            CoordinateSystem::Left.texture_probe_counts(counts)
        );

        assert_eq!(
            uvec3(3, 2, 4),
            CoordinateSystem::LeftZUp.texture_probe_counts(counts)
        );

        assert_eq!(
            uvec3(2, 4, 3),
            CoordinateSystem::Right.texture_probe_counts(counts)
        );

        assert_eq!(
            uvec3(2, 3, 4),
            CoordinateSystem::RightZUp.texture_probe_counts(counts)
        );
    }
}
