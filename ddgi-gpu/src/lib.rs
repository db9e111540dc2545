//! Records and pure functions shared between the DDGI volume bookkeeping
//! and the shaders that consume it.
//!
//! Everything in here has to stay bit-compatible with the shader-side
//! declarations - in particular [`PackedVolume`], which is uploaded once per
//! frame per volume.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod coordinate_system;
mod packed_volume;
mod probe_grid;
mod root_constants;
mod utils;
mod volume;

pub use self::coordinate_system::*;
pub use self::packed_volume::*;
pub use self::probe_grid::*;
pub use self::root_constants::*;
pub use self::utils::*;
pub use self::volume::*;

/// Largest number of probes along a single axis; limited by the 10-bit
/// fields of [`PackedVolume::packed0`].
pub const MAX_PROBE_COUNT: u32 = layout::PROBE_COUNT_X.max_value();

/// Largest number of rays traced per probe; limited by the 16-bit field of
/// [`PackedVolume::packed2`].
pub const MAX_PROBE_NUM_RAYS: u32 = layout::PROBE_NUM_RAYS.max_value();

/// Largest number of interior (border-excluded) texels along one side of a
/// probe's irradiance or distance octahedron.
pub const MAX_PROBE_INTERIOR_TEXELS: u32 =
    layout::PROBE_NUM_IRRADIANCE_INTERIOR_TEXELS.max_value();

/// Largest scroll-offset magnitude that survives packing.
///
/// The wire field is 15 bits wide, but we keep the topmost magnitude bit
/// clear; anything above this saturates.
pub const MAX_SCROLL_OFFSET: i32 = (1 << 14) - 1;
