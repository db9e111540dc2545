use glam::{IVec3, Quat, UVec3, Vec3, Vec4};

use crate::{PackedVolume, ProbeGrid};

/// Full-precision per-volume constants, as consumed by the probe-tracing and
/// probe-blending shaders.
///
/// This is the widened form of [`PackedVolume`]; it's never uploaded as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Volume {
    /// World-space origin of the volume, excluding scroll offsets.
    pub origin: Vec3,

    /// Volume's rotation, as a quaternion stored `xyzw`.
    pub rotation: Vec4,

    /// This frame's probe-ray rotation, as a quaternion stored `xyzw`.
    pub probe_ray_rotation: Vec4,

    /// 0 = default, 1 = infinite scrolling.
    pub movement_type: u32,

    pub probe_spacing: Vec3,
    pub probe_counts: UVec3,
    pub probe_num_rays: u32,
    pub probe_num_irradiance_interior_texels: u32,
    pub probe_num_distance_interior_texels: u32,
    pub probe_hysteresis: f32,
    pub probe_max_ray_distance: f32,
    pub probe_normal_bias: f32,
    pub probe_view_bias: f32,
    pub probe_distance_exponent: f32,
    pub probe_irradiance_encoding_gamma: f32,
    pub probe_irradiance_threshold: f32,
    pub probe_brightness_threshold: f32,
    pub probe_random_ray_backface_threshold: f32,
    pub probe_fixed_ray_backface_threshold: f32,
    pub probe_min_frontface_distance: f32,

    /// Scroll offsets, in whole probes.
    pub probe_scroll_offsets: IVec3,

    /// Whether the probe plane that wrapped around on given axis has to be
    /// cleared this frame.
    pub probe_scroll_clear: [bool; 3],

    /// Direction of the last scroll on given axis (`true` = positive).
    pub probe_scroll_directions: [bool; 3],

    pub probe_ray_data_format: u32,
    pub probe_irradiance_format: u32,
    pub probe_relocation_enabled: bool,
    pub probe_classification_enabled: bool,
    pub probe_variability_enabled: bool,
}

impl Volume {
    pub fn pack(&self) -> PackedVolume {
        PackedVolume::pack(self)
    }

    pub fn is_scrolling(&self) -> bool {
        self.movement_type == 1
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_vec4(self.rotation)
    }

    pub fn probe_ray_rotation(&self) -> Quat {
        Quat::from_vec4(self.probe_ray_rotation)
    }

    /// Returns world-space position of probe at given grid coordinates.
    pub fn probe_world_position(&self, coords: UVec3) -> Vec3 {
        let grid = ProbeGrid::new(self.probe_counts, Default::default());

        let local = (grid.centered_coords(coords)
            + self.probe_scroll_offsets.as_vec3())
            * self.probe_spacing;

        self.origin + self.rotation() * local
    }
}
