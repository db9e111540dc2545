use derivative::Derivative;

use crate::gpu;

/// Renderer-wide settings shared by every volume.
#[derive(Clone, Copy, Debug, Derivative)]
#[derivative(Default)]
pub struct Config {
    /// Convention of the host renderer; has to match the shaders.
    pub coordinate_system: gpu::CoordinateSystem,

    /// Whether scheduled dispatches get wrapped in debug markers at all.
    ///
    /// Each volume can opt out on its own through
    /// [`crate::VolumeDesc::insert_perf_markers`].
    #[derivative(Default(value = "true"))]
    pub insert_perf_markers: bool,
}
