use bytemuck::{Pod, Zeroable};
use glam::{ivec3, uvec3, Vec3, Vec4};

use self::layout::*;
use crate::{BitField, Volume, MAX_SCROLL_OFFSET};

/// Compact form of [`Volume`], uploaded into the shared per-volume constants
/// buffer (one record per volume, addressed by the volume's index).
///
/// Unlike the full-precision record, this one is lossy: backface thresholds
/// are stored as unorm16 and scroll offsets saturate at
/// [`MAX_SCROLL_OFFSET`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PackedVolume {
    pub origin: Vec3,
    pub probe_hysteresis: f32,
    pub rotation: Vec4,
    pub probe_ray_rotation: Vec4,
    pub probe_max_ray_distance: f32,
    pub probe_normal_bias: f32,
    pub probe_view_bias: f32,
    pub probe_distance_exponent: f32,
    pub probe_spacing: Vec3,

    /// x: bits 0..10, y: bits 10..20, z: bits 20..30
    pub packed0: u32,

    pub probe_irradiance_encoding_gamma: f32,
    pub probe_irradiance_threshold: f32,
    pub probe_brightness_threshold: f32,

    /// random-ray backface threshold: bits 0..16,
    /// fixed-ray backface threshold: bits 16..32
    pub packed1: u32,

    pub probe_min_frontface_distance: f32,

    /// rays: bits 0..16, irradiance texels: 16..24, distance texels: 24..32
    pub packed2: u32,

    /// scroll offset x: bits 0..16, scroll offset y: bits 16..32
    pub packed3: u32,

    pub _pad0: u32,

    /// See [`layout`].
    pub packed4: u32,

    pub _pad1: [u32; 3],
}

const _: () = assert!(std::mem::size_of::<PackedVolume>() == 128);

impl PackedVolume {
    pub fn pack(volume: &Volume) -> Self {
        let mut packed0 = 0;

        PROBE_COUNT_X.set(&mut packed0, volume.probe_counts.x);
        PROBE_COUNT_Y.set(&mut packed0, volume.probe_counts.y);
        PROBE_COUNT_Z.set(&mut packed0, volume.probe_counts.z);

        let mut packed1 = 0;

        PROBE_RANDOM_RAY_BACKFACE_THRESHOLD.set(
            &mut packed1,
            encode_unorm16(volume.probe_random_ray_backface_threshold),
        );

        PROBE_FIXED_RAY_BACKFACE_THRESHOLD.set(
            &mut packed1,
            encode_unorm16(volume.probe_fixed_ray_backface_threshold),
        );

        let mut packed2 = 0;

        PROBE_NUM_RAYS.set(&mut packed2, volume.probe_num_rays);

        PROBE_NUM_IRRADIANCE_INTERIOR_TEXELS
            .set(&mut packed2, volume.probe_num_irradiance_interior_texels);

        PROBE_NUM_DISTANCE_INTERIOR_TEXELS
            .set(&mut packed2, volume.probe_num_distance_interior_texels);

        let mut packed3 = 0;

        encode_scroll_offset(
            &mut packed3,
            PROBE_SCROLL_OFFSET_X,
            volume.probe_scroll_offsets.x,
        );

        encode_scroll_offset(
            &mut packed3,
            PROBE_SCROLL_OFFSET_Y,
            volume.probe_scroll_offsets.y,
        );

        let mut packed4 = 0;

        encode_scroll_offset(
            &mut packed4,
            PROBE_SCROLL_OFFSET_Z,
            volume.probe_scroll_offsets.z,
        );

        MOVEMENT_TYPE.set(&mut packed4, volume.movement_type);
        PROBE_RAY_DATA_FORMAT.set(&mut packed4, volume.probe_ray_data_format);

        PROBE_IRRADIANCE_FORMAT
            .set(&mut packed4, volume.probe_irradiance_format);

        PROBE_RELOCATION_ENABLED
            .set_bool(&mut packed4, volume.probe_relocation_enabled);

        PROBE_CLASSIFICATION_ENABLED
            .set_bool(&mut packed4, volume.probe_classification_enabled);

        PROBE_VARIABILITY_ENABLED
            .set_bool(&mut packed4, volume.probe_variability_enabled);

        for axis in 0..3 {
            PROBE_SCROLL_CLEAR[axis]
                .set_bool(&mut packed4, volume.probe_scroll_clear[axis]);

            PROBE_SCROLL_DIRECTIONS[axis]
                .set_bool(&mut packed4, volume.probe_scroll_directions[axis]);
        }

        Self {
            origin: volume.origin,
            probe_hysteresis: volume.probe_hysteresis,
            rotation: volume.rotation,
            probe_ray_rotation: volume.probe_ray_rotation,
            probe_max_ray_distance: volume.probe_max_ray_distance,
            probe_normal_bias: volume.probe_normal_bias,
            probe_view_bias: volume.probe_view_bias,
            probe_distance_exponent: volume.probe_distance_exponent,
            probe_spacing: volume.probe_spacing,
            packed0,
            probe_irradiance_encoding_gamma: volume
                .probe_irradiance_encoding_gamma,
            probe_irradiance_threshold: volume.probe_irradiance_threshold,
            probe_brightness_threshold: volume.probe_brightness_threshold,
            packed1,
            probe_min_frontface_distance: volume.probe_min_frontface_distance,
            packed2,
            packed3,
            _pad0: 0,
            packed4,
            _pad1: [0; 3],
        }
    }

    pub fn unpack(&self) -> Volume {
        let probe_counts = uvec3(
            PROBE_COUNT_X.get(self.packed0),
            PROBE_COUNT_Y.get(self.packed0),
            PROBE_COUNT_Z.get(self.packed0),
        );

        let probe_scroll_offsets = ivec3(
            decode_scroll_offset(self.packed3, PROBE_SCROLL_OFFSET_X),
            decode_scroll_offset(self.packed3, PROBE_SCROLL_OFFSET_Y),
            decode_scroll_offset(self.packed4, PROBE_SCROLL_OFFSET_Z),
        );

        let probe_scroll_clear =
            PROBE_SCROLL_CLEAR.map(|field| field.get_bool(self.packed4));

        let probe_scroll_directions =
            PROBE_SCROLL_DIRECTIONS.map(|field| field.get_bool(self.packed4));

        Volume {
            origin: self.origin,
            rotation: self.rotation,
            probe_ray_rotation: self.probe_ray_rotation,
            movement_type: MOVEMENT_TYPE.get(self.packed4),
            probe_spacing: self.probe_spacing,
            probe_counts,
            probe_num_rays: PROBE_NUM_RAYS.get(self.packed2),
            probe_num_irradiance_interior_texels:
                PROBE_NUM_IRRADIANCE_INTERIOR_TEXELS.get(self.packed2),
            probe_num_distance_interior_texels:
                PROBE_NUM_DISTANCE_INTERIOR_TEXELS.get(self.packed2),
            probe_hysteresis: self.probe_hysteresis,
            probe_max_ray_distance: self.probe_max_ray_distance,
            probe_normal_bias: self.probe_normal_bias,
            probe_view_bias: self.probe_view_bias,
            probe_distance_exponent: self.probe_distance_exponent,
            probe_irradiance_encoding_gamma: self
                .probe_irradiance_encoding_gamma,
            probe_irradiance_threshold: self.probe_irradiance_threshold,
            probe_brightness_threshold: self.probe_brightness_threshold,
            probe_random_ray_backface_threshold: decode_unorm16(
                PROBE_RANDOM_RAY_BACKFACE_THRESHOLD.get(self.packed1),
            ),
            probe_fixed_ray_backface_threshold: decode_unorm16(
                PROBE_FIXED_RAY_BACKFACE_THRESHOLD.get(self.packed1),
            ),
            probe_min_frontface_distance: self.probe_min_frontface_distance,
            probe_scroll_offsets,
            probe_scroll_clear,
            probe_scroll_directions,
            probe_ray_data_format: PROBE_RAY_DATA_FORMAT.get(self.packed4),
            probe_irradiance_format: PROBE_IRRADIANCE_FORMAT.get(self.packed4),
            probe_relocation_enabled: PROBE_RELOCATION_ENABLED
                .get_bool(self.packed4),
            probe_classification_enabled: PROBE_CLASSIFICATION_ENABLED
                .get_bool(self.packed4),
            probe_variability_enabled: PROBE_VARIABILITY_ENABLED
                .get_bool(self.packed4),
        }
    }
}

/// Positions of the bit-packed fields within [`PackedVolume`]'s `packed*`
/// words.
pub mod layout {
    use crate::BitField;

    // packed0
    pub const PROBE_COUNT_X: BitField = BitField::new(0, 10);
    pub const PROBE_COUNT_Y: BitField = BitField::new(10, 10);
    pub const PROBE_COUNT_Z: BitField = BitField::new(20, 10);

    // packed1
    pub const PROBE_RANDOM_RAY_BACKFACE_THRESHOLD: BitField =
        BitField::new(0, 16);
    pub const PROBE_FIXED_RAY_BACKFACE_THRESHOLD: BitField =
        BitField::new(16, 16);

    // packed2
    pub const PROBE_NUM_RAYS: BitField = BitField::new(0, 16);
    pub const PROBE_NUM_IRRADIANCE_INTERIOR_TEXELS: BitField =
        BitField::new(16, 8);
    pub const PROBE_NUM_DISTANCE_INTERIOR_TEXELS: BitField =
        BitField::new(24, 8);

    // packed3 (x, y) and packed4 (z); each as [magnitude, sign]
    pub const PROBE_SCROLL_OFFSET_X: [BitField; 2] =
        [BitField::new(0, 15), BitField::new(15, 1)];
    pub const PROBE_SCROLL_OFFSET_Y: [BitField; 2] =
        [BitField::new(16, 15), BitField::new(31, 1)];
    pub const PROBE_SCROLL_OFFSET_Z: [BitField; 2] =
        [BitField::new(0, 15), BitField::new(15, 1)];

    // packed4
    pub const MOVEMENT_TYPE: BitField = BitField::new(16, 1);
    pub const PROBE_RAY_DATA_FORMAT: BitField = BitField::new(17, 3);
    pub const PROBE_IRRADIANCE_FORMAT: BitField = BitField::new(20, 3);
    pub const PROBE_RELOCATION_ENABLED: BitField = BitField::new(23, 1);
    pub const PROBE_CLASSIFICATION_ENABLED: BitField = BitField::new(24, 1);
    pub const PROBE_VARIABILITY_ENABLED: BitField = BitField::new(25, 1);

    pub const PROBE_SCROLL_CLEAR: [BitField; 3] = [
        BitField::new(26, 1),
        BitField::new(27, 1),
        BitField::new(28, 1),
    ];

    pub const PROBE_SCROLL_DIRECTIONS: [BitField; 3] = [
        BitField::new(29, 1),
        BitField::new(30, 1),
        BitField::new(31, 1),
    ];

    /// All fields, grouped by the word they live in.
    pub const WORDS: [&[BitField]; 5] = [
        &[PROBE_COUNT_X, PROBE_COUNT_Y, PROBE_COUNT_Z],
        &[
            PROBE_RANDOM_RAY_BACKFACE_THRESHOLD,
            PROBE_FIXED_RAY_BACKFACE_THRESHOLD,
        ],
        &[
            PROBE_NUM_RAYS,
            PROBE_NUM_IRRADIANCE_INTERIOR_TEXELS,
            PROBE_NUM_DISTANCE_INTERIOR_TEXELS,
        ],
        &[
            PROBE_SCROLL_OFFSET_X[0],
            PROBE_SCROLL_OFFSET_X[1],
            PROBE_SCROLL_OFFSET_Y[0],
            PROBE_SCROLL_OFFSET_Y[1],
        ],
        &[
            PROBE_SCROLL_OFFSET_Z[0],
            PROBE_SCROLL_OFFSET_Z[1],
            MOVEMENT_TYPE,
            PROBE_RAY_DATA_FORMAT,
            PROBE_IRRADIANCE_FORMAT,
            PROBE_RELOCATION_ENABLED,
            PROBE_CLASSIFICATION_ENABLED,
            PROBE_VARIABILITY_ENABLED,
            PROBE_SCROLL_CLEAR[0],
            PROBE_SCROLL_CLEAR[1],
            PROBE_SCROLL_CLEAR[2],
            PROBE_SCROLL_DIRECTIONS[0],
            PROBE_SCROLL_DIRECTIONS[1],
            PROBE_SCROLL_DIRECTIONS[2],
        ],
    ];
}

fn encode_unorm16(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * 65535.0).round() as u32
}

fn decode_unorm16(value: u32) -> f32 {
    value as f32 / 65535.0
}

fn encode_scroll_offset(
    word: &mut u32,
    [magnitude, sign]: [BitField; 2],
    value: i32,
) {
    magnitude.set(word, value.unsigned_abs().min(MAX_SCROLL_OFFSET as u32));
    sign.set_bool(word, value < 0);
}

fn decode_scroll_offset(word: u32, [magnitude, sign]: [BitField; 2]) -> i32 {
    let magnitude = magnitude.get(word) as i32;

    if sign.get_bool(word) {
        -magnitude
    } else {
        magnitude
    }
}
