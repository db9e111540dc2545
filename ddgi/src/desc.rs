use derivative::Derivative;
use glam::{uvec3, UVec3, Vec3};

use crate::{
    gpu, Axis, ConfigError, DistanceFormat, IrradianceFormat, ProbeDataFormat,
    RayDataFormat, Result, VariabilityFormat,
};

/// Largest slot a volume can occupy within the packed-volumes buffer.
pub const MAX_VOLUME_INDEX: u32 = 1023;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementType {
    /// Volume stays where it's put, probes never wrap around.
    #[default]
    Default,

    /// Volume follows [`crate::Volume::set_scroll_anchor()`] in whole-probe
    /// steps, recycling the probe planes that fall behind.
    Scrolling,
}

impl MovementType {
    pub fn bits(self) -> u32 {
        match self {
            MovementType::Default => 0,
            MovementType::Scrolling => 1,
        }
    }
}

/// Authoritative configuration of a single volume.
#[derive(Clone, Debug, Derivative)]
#[derivative(Default)]
pub struct VolumeDesc {
    pub name: String,

    /// Slot of this volume within the shared packed-volumes buffer; has to be
    /// unique among the active volumes and at most [`MAX_VOLUME_INDEX`].
    pub index: u32,

    /// Seed of the stream used to randomize probe-ray directions.
    pub rng_seed: u64,

    pub origin: Vec3,

    /// Rotation of the volume, in radians; has to stay zero for scrolling
    /// volumes.
    pub euler_angles: Vec3,

    /// World-space distance between neighbouring probes.
    #[derivative(Default(value = "Vec3::ONE"))]
    pub probe_spacing: Vec3,

    #[derivative(Default(value = "uvec3(8, 8, 8)"))]
    pub probe_counts: UVec3,

    #[derivative(Default(value = "256"))]
    pub probe_num_rays: u32,

    /// Side of a probe's irradiance octahedron, excluding the 1-texel border.
    #[derivative(Default(value = "6"))]
    pub probe_num_irradiance_interior_texels: u32,

    /// Side of a probe's distance octahedron, excluding the 1-texel border.
    #[derivative(Default(value = "14"))]
    pub probe_num_distance_interior_texels: u32,

    /// Weight of the previous frame's value during blending; must be within
    /// `0.0 .. 1.0`.
    #[derivative(Default(value = "0.97"))]
    pub probe_hysteresis: f32,

    #[derivative(Default(value = "1e27"))]
    pub probe_max_ray_distance: f32,

    #[derivative(Default(value = "0.1"))]
    pub probe_normal_bias: f32,

    #[derivative(Default(value = "0.1"))]
    pub probe_view_bias: f32,

    #[derivative(Default(value = "50.0"))]
    pub probe_distance_exponent: f32,

    #[derivative(Default(value = "5.0"))]
    pub probe_irradiance_encoding_gamma: f32,

    /// Max per-channel change above which hysteresis gets reduced.
    #[derivative(Default(value = "0.25"))]
    pub probe_irradiance_threshold: f32,

    /// Max brightness change allowed within a single update.
    #[derivative(Default(value = "0.1"))]
    pub probe_brightness_threshold: f32,

    /// Ratio of backface hits (among the random rays) above which a probe is
    /// considered to be inside geometry; `0.0 ..= 1.0`.
    #[derivative(Default(value = "0.1"))]
    pub probe_random_ray_backface_threshold: f32,

    /// Same as above, but for the fixed rays used by relocation and
    /// classification; `0.0 ..= 1.0`.
    #[derivative(Default(value = "0.25"))]
    pub probe_fixed_ray_backface_threshold: f32,

    #[derivative(Default(value = "1.0"))]
    pub probe_min_frontface_distance: f32,

    pub probe_relocation_enabled: bool,
    pub probe_relocation_needs_reset: bool,
    pub probe_classification_enabled: bool,
    pub probe_classification_needs_reset: bool,
    pub probe_variability_enabled: bool,

    pub movement_type: MovementType,

    pub probe_ray_data_format: RayDataFormat,
    pub probe_irradiance_format: IrradianceFormat,
    pub probe_distance_format: DistanceFormat,
    pub probe_data_format: ProbeDataFormat,
    pub probe_variability_format: VariabilityFormat,

    /// Whether this volume's dispatches get their own debug markers; see
    /// also [`crate::Config::insert_perf_markers`].
    #[derivative(Default(value = "true"))]
    pub insert_perf_markers: bool,
}

impl VolumeDesc {
    pub fn validate(&self) -> Result<()> {
        if self.index > MAX_VOLUME_INDEX {
            return Err(ConfigError::InvalidVolumeIndex {
                index: self.index,
                max: MAX_VOLUME_INDEX,
            });
        }

        let counts = self.probe_counts;

        if counts.cmpeq(UVec3::ZERO).any() {
            return Err(ConfigError::InvalidProbeCounts { counts });
        }

        if counts.cmpgt(UVec3::splat(gpu::MAX_PROBE_COUNT)).any() {
            return Err(ConfigError::ProbeCountsOverflow {
                counts,
                max: gpu::MAX_PROBE_COUNT,
            });
        }

        for axis in Axis::ALL {
            let spacing = self.probe_spacing[axis.idx()];

            if self.movement_type == MovementType::Scrolling && spacing == 0.0
            {
                return Err(ConfigError::ZeroScrollSpacing { axis });
            }

            // Single-probe axes don't care about spacing, so we allow zero
            // there
            let is_valid = if counts[axis.idx()] > 1 {
                spacing > 0.0 && spacing.is_finite()
            } else {
                spacing >= 0.0 && spacing.is_finite()
            };

            if !is_valid {
                return Err(ConfigError::InvalidProbeSpacing {
                    axis,
                    value: spacing,
                });
            }
        }

        if self.probe_num_rays == 0
            || self.probe_num_rays > gpu::MAX_PROBE_NUM_RAYS
        {
            return Err(ConfigError::InvalidRayCount {
                value: self.probe_num_rays,
                max: gpu::MAX_PROBE_NUM_RAYS,
            });
        }

        for (kind, value) in [
            ("irradiance", self.probe_num_irradiance_interior_texels),
            ("distance", self.probe_num_distance_interior_texels),
        ] {
            if value == 0 || value > gpu::MAX_PROBE_INTERIOR_TEXELS {
                return Err(ConfigError::InvalidTexelCount {
                    kind,
                    value,
                    max: gpu::MAX_PROBE_INTERIOR_TEXELS,
                });
            }
        }

        check("probe_hysteresis", self.probe_hysteresis, |v| {
            (0.0..1.0).contains(&v)
        })?;

        for (field, value) in [
            ("probe_max_ray_distance", self.probe_max_ray_distance),
            ("probe_distance_exponent", self.probe_distance_exponent),
            (
                "probe_irradiance_encoding_gamma",
                self.probe_irradiance_encoding_gamma,
            ),
            (
                "probe_min_frontface_distance",
                self.probe_min_frontface_distance,
            ),
        ] {
            check(field, value, |v| v > 0.0)?;
        }

        for (field, value) in [
            (
                "probe_random_ray_backface_threshold",
                self.probe_random_ray_backface_threshold,
            ),
            (
                "probe_fixed_ray_backface_threshold",
                self.probe_fixed_ray_backface_threshold,
            ),
        ] {
            check(field, value, |v| (0.0..=1.0).contains(&v))?;
        }

        for (field, value) in [
            ("probe_normal_bias", self.probe_normal_bias),
            ("probe_view_bias", self.probe_view_bias),
            ("probe_irradiance_threshold", self.probe_irradiance_threshold),
            ("probe_brightness_threshold", self.probe_brightness_threshold),
        ] {
            check(field, value, f32::is_finite)?;
        }

        for (field, value) in
            [("origin", self.origin), ("euler_angles", self.euler_angles)]
        {
            for value in value.to_array() {
                check(field, value, f32::is_finite)?;
            }
        }

        if self.movement_type == MovementType::Scrolling
            && self.euler_angles != Vec3::ZERO
        {
            return Err(ConfigError::RotatedScrollingVolume);
        }

        Ok(())
    }

    /// Side of a probe's irradiance octahedron, including the border.
    pub fn probe_num_irradiance_texels(&self) -> u32 {
        self.probe_num_irradiance_interior_texels + 2
    }

    /// Side of a probe's distance octahedron, including the border.
    pub fn probe_num_distance_texels(&self) -> u32 {
        self.probe_num_distance_interior_texels + 2
    }

    pub fn num_probes(&self) -> u32 {
        self.probe_counts.x * self.probe_counts.y * self.probe_counts.z
    }

    pub fn describe(&self) -> String {
        format!(
            "`{}` (#{}): {}x{}x{} probes, {} rays, {:?}",
            self.name,
            self.index,
            self.probe_counts.x,
            self.probe_counts.y,
            self.probe_counts.z,
            self.probe_num_rays,
            self.movement_type,
        )
    }
}

fn check(
    field: &'static str,
    value: f32,
    is_valid: impl Fn(f32) -> bool,
) -> Result<()> {
    if is_valid(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
