use glam::{uvec3, UVec3};

use crate::{formats, gpu, VolumeDesc};

/// Footprint of a single variability-reduction workgroup: 4x8x4 threads,
/// each sampling 4x2x1 texels.
pub const VARIABILITY_REDUCTION_FOOTPRINT: UVec3 = UVec3::new(16, 16, 4);

/// Textures backing a single volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Radiance and hit distance of each traced ray; one row per probe.
    RayData,

    /// Octahedral irradiance, one tile (with border) per probe.
    Irradiance,

    /// Octahedral mean distance and mean squared distance, one tile (with
    /// border) per probe.
    Distance,

    /// Relocation offsets and classification states, one texel per probe.
    ProbeData,

    /// Per-texel irradiance variability, one borderless tile per probe.
    Variability,

    /// Reduced [`Self::Variability`].
    VariabilityAverage,
}

impl TextureKind {
    pub const ALL: [Self; 6] = [
        Self::RayData,
        Self::Irradiance,
        Self::Distance,
        Self::ProbeData,
        Self::Variability,
        Self::VariabilityAverage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::RayData => "ddgi_ray_data",
            Self::Irradiance => "ddgi_irradiance",
            Self::Distance => "ddgi_distance",
            Self::ProbeData => "ddgi_probe_data",
            Self::Variability => "ddgi_variability",
            Self::VariabilityAverage => "ddgi_variability_average",
        }
    }

    /// Returns size of this texture as a 2D array: `width`, `height` and
    /// the number of layers.
    pub fn dimensions(
        self,
        desc: &VolumeDesc,
        coordinate_system: gpu::CoordinateSystem,
    ) -> wgpu::Extent3d {
        let probes = coordinate_system.texture_probe_counts(desc.probe_counts);

        let size = match self {
            Self::RayData => {
                uvec3(desc.probe_num_rays, probes.x * probes.y, probes.z)
            }

            Self::Irradiance => {
                tiled(probes, desc.probe_num_irradiance_texels())
            }

            Self::Distance => tiled(probes, desc.probe_num_distance_texels()),
            Self::ProbeData => probes,

            Self::Variability => {
                tiled(probes, desc.probe_num_irradiance_interior_texels)
            }

            Self::VariabilityAverage => {
                let size =
                    tiled(probes, desc.probe_num_irradiance_interior_texels);

                (size + VARIABILITY_REDUCTION_FOOTPRINT - 1)
                    / VARIABILITY_REDUCTION_FOOTPRINT
            }
        };

        wgpu::Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: size.z,
        }
    }

    pub fn format(self, desc: &VolumeDesc) -> wgpu::TextureFormat {
        match self {
            Self::RayData => desc.probe_ray_data_format.texture_format(),
            Self::Irradiance => desc.probe_irradiance_format.texture_format(),
            Self::Distance => desc.probe_distance_format.texture_format(),
            Self::ProbeData => desc.probe_data_format.texture_format(),
            Self::Variability => desc.probe_variability_format.texture_format(),
            Self::VariabilityAverage => formats::VARIABILITY_AVERAGE_FORMAT,
        }
    }

    pub fn descriptor(
        self,
        desc: &VolumeDesc,
        coordinate_system: gpu::CoordinateSystem,
    ) -> wgpu::TextureDescriptor<'static> {
        wgpu::TextureDescriptor {
            label: Some(self.label()),
            size: self.dimensions(desc, coordinate_system),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format(desc),
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        }
    }
}

fn tiled(probes: UVec3, texels: u32) -> UVec3 {
    uvec3(probes.x * texels, probes.y * texels, probes.z)
}
