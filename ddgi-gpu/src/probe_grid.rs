use glam::{uvec3, UVec3, Vec3};

use crate::CoordinateSystem;

/// Linear-index addressing of a volume's probes.
///
/// Probes are linearized row-major; which axis varies fastest depends on the
/// coordinate system, the up-axis always varies slowest (so that one texture
/// array slice holds one horizontal layer of probes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeGrid {
    counts: UVec3,
    coordinate_system: CoordinateSystem,
}

impl ProbeGrid {
    pub fn new(counts: UVec3, coordinate_system: CoordinateSystem) -> Self {
        Self {
            counts,
            coordinate_system,
        }
    }

    pub fn counts(&self) -> UVec3 {
        self.counts
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    pub fn len(&self) -> u32 {
        self.counts.x * self.counts.y * self.counts.z
    }

    pub fn contains(&self, coords: UVec3) -> bool {
        coords.cmplt(self.counts).all()
    }

    /// Returns grid coordinates of given probe.
    ///
    /// Indices outside `0..self.len()` are a programming error; they trip an
    /// assertion in debug builds and produce garbage in release ones.
    pub fn coords(&self, index: u32) -> UVec3 {
        debug_assert!(
            index < self.len(),
            "probe index out of range: {index} >= {}",
            self.len()
        );

        let c = self.counts;

        match self.coordinate_system {
            CoordinateSystem::Left | CoordinateSystem::Right => uvec3(
                index % c.x,
                index / (c.x * c.z),
                (index / c.x) % c.z,
            ),

            CoordinateSystem::LeftZUp => uvec3(
                (index / c.y) % c.x,
                index % c.y,
                index / (c.x * c.y),
            ),

            CoordinateSystem::RightZUp => uvec3(
                index % c.x,
                (index / c.x) % c.y,
                index / (c.x * c.y),
            ),
        }
    }

    /// Inverse of [`Self::coords()`].
    pub fn index(&self, coords: UVec3) -> u32 {
        debug_assert!(
            self.contains(coords),
            "probe coords out of range: {coords} >= {}",
            self.counts
        );

        let c = self.counts;

        match self.coordinate_system {
            CoordinateSystem::Left | CoordinateSystem::Right => {
                coords.x + coords.z * c.x + coords.y * c.x * c.z
            }

            CoordinateSystem::LeftZUp => {
                coords.y + coords.x * c.y + coords.z * c.x * c.y
            }

            CoordinateSystem::RightZUp => {
                coords.x + coords.y * c.x + coords.z * c.x * c.y
            }
        }
    }

    /// Returns probe's coordinates relative to the center of the grid, still
    /// in grid units (e.g. `-1.5 ..= 1.5` for an axis with four probes).
    pub fn centered_coords(&self, coords: UVec3) -> Vec3 {
        coords.as_vec3() - (self.counts.as_vec3() - 1.0) / 2.0
    }
}
