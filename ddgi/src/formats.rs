//! Pixel formats of the textures backing a volume.
//!
//! Every texture kind gets its own closed enum, so that e.g. an irradiance
//! format can't be accidentally used for distance data; the `bits()` value is
//! what ends up inside [`crate::gpu::PackedVolume`].

macro_rules! formats {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $bits:literal => $format:ident, $bytes:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn bits(self) -> u32 {
                match self {
                    $(Self::$variant => $bits,)+
                }
            }

            pub fn from_bits(bits: u32) -> Option<Self> {
                match bits {
                    $($bits => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn texture_format(self) -> wgpu::TextureFormat {
                match self {
                    $(Self::$variant => wgpu::TextureFormat::$format,)+
                }
            }

            pub fn bytes_per_texel(self) -> u32 {
                match self {
                    $(Self::$variant => $bytes,)+
                }
            }
        }
    };
}

formats! {
    /// Format of the per-ray radiance and hit-distance texture.
    RayDataFormat {
        #[default]
        F32x2 = 0 => Rg32Float, 8,
        F32x4 = 1 => Rgba32Float, 16,
    }
}

formats! {
    IrradianceFormat {
        /// 10 bits per color channel; requires the shaders to apply
        /// [`crate::VolumeDesc::probe_irradiance_encoding_gamma`].
        #[default]
        U32 = 0 => Rgb10a2Unorm, 4,
        F16x4 = 1 => Rgba16Float, 8,
        F32x4 = 2 => Rgba32Float, 16,
    }
}

formats! {
    DistanceFormat {
        /// Might be not precise enough for very large volumes.
        #[default]
        F16x2 = 0 => Rg16Float, 4,
        F32x2 = 1 => Rg32Float, 8,
    }
}

formats! {
    /// Format of the texture holding per-probe relocation offsets and
    /// classification states.
    ProbeDataFormat {
        #[default]
        F16x4 = 0 => Rgba16Float, 8,
        F32x4 = 1 => Rgba32Float, 16,
    }
}

formats! {
    VariabilityFormat {
        #[default]
        F16 = 0 => R16Float, 2,
        F32 = 1 => R32Float, 4,
    }
}

/// Format of the reduced variability texture; not configurable.
pub const VARIABILITY_AVERAGE_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rg32Float;

pub const VARIABILITY_AVERAGE_BYTES_PER_TEXEL: u32 = 8;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::gpu;

    fn check<T>(
        all: &[T],
        bits: impl Fn(T) -> u32,
        from_bits: impl Fn(u32) -> Option<T>,
        texture_format: impl Fn(T) -> wgpu::TextureFormat,
        bytes_per_texel: impl Fn(T) -> u32,
        field: gpu::BitField,
    ) where
        T: Copy + PartialEq + std::fmt::Debug,
    {
        let mut seen = HashSet::new();

        for &format in all {
            let b = bits(format);

            assert!(b <= field.max_value(), "{format:?} doesn't fit");
            assert!(seen.insert(b), "{format:?} reuses bits {b}");
            assert_eq!(Some(format), from_bits(b));

            assert_eq!(
                texture_format(format).block_size(None),
                Some(bytes_per_texel(format)),
                "{format:?}"
            );
        }

        for b in 0..=field.max_value() {
            assert_eq!(seen.contains(&b), from_bits(b).is_some());
        }
    }

    #[test]
    fn ray_data() {
        check(
            RayDataFormat::ALL,
            RayDataFormat::bits,
            RayDataFormat::from_bits,
            RayDataFormat::texture_format,
            RayDataFormat::bytes_per_texel,
            gpu::layout::PROBE_RAY_DATA_FORMAT,
        );
    }

    #[test]
    fn irradiance() {
        check(
            IrradianceFormat::ALL,
            IrradianceFormat::bits,
            IrradianceFormat::from_bits,
            IrradianceFormat::texture_format,
            IrradianceFormat::bytes_per_texel,
            gpu::layout::PROBE_IRRADIANCE_FORMAT,
        );
    }

    // Distance, probe-data and variability formats aren't packed, but they
    // still have to fit the same 3-bit budget.

    #[test]
    fn distance() {
        check(
            DistanceFormat::ALL,
            DistanceFormat::bits,
            DistanceFormat::from_bits,
            DistanceFormat::texture_format,
            DistanceFormat::bytes_per_texel,
            gpu::layout::PROBE_IRRADIANCE_FORMAT,
        );
    }

    #[test]
    fn probe_data() {
        check(
            ProbeDataFormat::ALL,
            ProbeDataFormat::bits,
            ProbeDataFormat::from_bits,
            ProbeDataFormat::texture_format,
            ProbeDataFormat::bytes_per_texel,
            gpu::layout::PROBE_IRRADIANCE_FORMAT,
        );
    }

    #[test]
    fn variability() {
        check(
            VariabilityFormat::ALL,
            VariabilityFormat::bits,
            VariabilityFormat::from_bits,
            VariabilityFormat::texture_format,
            VariabilityFormat::bytes_per_texel,
            gpu::layout::PROBE_IRRADIANCE_FORMAT,
        );
    }

    #[test]
    fn variability_average() {
        assert_eq!(
            Some(VARIABILITY_AVERAGE_BYTES_PER_TEXEL),
            VARIABILITY_AVERAGE_FORMAT.block_size(None)
        );
    }
}
