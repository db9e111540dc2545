use derivative::Derivative;
use glam::{IVec3, Mat3, Quat, UVec3, Vec3};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    euler_angles_to_rotation_matrix, formats, gpu, random_rotation,
    rotation_matrix_to_quaternion, BoundingBox, Config, ConfigError,
    DistanceFormat, EulerOrder, IrradianceFormat, MovementType,
    OrientedBoundingBox, ProbeDataFormat, RayDataFormat, Result, ScrollState,
    TextureKind, VariabilityFormat, VolumeDesc,
};

/// A grid of irradiance probes.
///
/// Call [`Self::update()`] once per frame, then upload
/// [`Self::desc_gpu_packed()`] into the volume's slot (see
/// [`VolumeDesc::index`]) and schedule the probe passes (see
/// [`crate::update_volume_probes()`]).
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Volume {
    config: Config,
    desc: VolumeDesc,
    rotation: Mat3,
    probe_ray_rotation: Mat3,
    scroll: ScrollState,

    #[derivative(Debug = "ignore")]
    rng: StdRng,
}

macro_rules! setters {
    ($( $(#[$meta:meta])* $fn:ident($field:ident: $ty:ty); )+) => {
        $(
            $(#[$meta])*
            pub fn $fn(&mut self, $field: $ty) -> Result<()> {
                self.modify(|desc| desc.$field = $field)
            }
        )+
    };
}

impl Volume {
    pub fn new(config: Config, desc: VolumeDesc) -> Result<Self> {
        desc.validate()?;

        info!("Creating volume: {}", desc.describe());

        let rotation = euler_angles_to_rotation_matrix(
            desc.euler_angles,
            EulerOrder::of(config.coordinate_system),
        );

        Ok(Self {
            scroll: ScrollState::new(desc.origin),
            rng: StdRng::seed_from_u64(desc.rng_seed),
            config,
            desc,
            rotation,
            probe_ray_rotation: Mat3::IDENTITY,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn desc(&self) -> &VolumeDesc {
        &self.desc
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn index(&self) -> u32 {
        self.desc.index
    }

    pub fn describe(&self) -> String {
        self.desc.describe()
    }

    /// Advances the volume by one frame: recomputes the rotation, draws a
    /// new probe-ray rotation and, for scrolling volumes, follows the scroll
    /// anchor.
    ///
    /// Doesn't touch the relocation and classification reset flags; see
    /// [`Self::acknowledge_probe_relocation_reset()`].
    pub fn update(&mut self) {
        self.rotation = euler_angles_to_rotation_matrix(
            self.desc.euler_angles,
            EulerOrder::of(self.config.coordinate_system),
        );

        self.probe_ray_rotation = random_rotation(&mut self.rng);

        if self.desc.movement_type == MovementType::Scrolling {
            let shift = self.scroll.step(
                &mut self.desc.origin,
                self.desc.probe_spacing,
                self.desc.probe_counts,
            );

            if shift != IVec3::ZERO {
                debug!(
                    "Volume `{}` scrolled by {shift}; offsets={}, origin={}",
                    self.desc.name,
                    self.scroll.offsets(),
                    self.desc.origin,
                );
            }
        }

        trace!("Volume `{}` updated", self.desc.name);
    }

    /// Replaces the entire configuration, provided it's valid.
    pub fn set_desc(&mut self, desc: VolumeDesc) -> Result<()> {
        self.modify(|this| *this = desc)
    }

    setters! {
        /// For scrolling volumes this teleports the grid: the scroll anchor
        /// is moved along and all scroll offsets are forgotten.
        set_origin(origin: Vec3);

        set_euler_angles(euler_angles: Vec3);
        set_probe_spacing(probe_spacing: Vec3);
        set_probe_counts(probe_counts: UVec3);
        set_probe_num_rays(probe_num_rays: u32);

        set_probe_num_irradiance_interior_texels(
            probe_num_irradiance_interior_texels: u32
        );

        set_probe_num_distance_interior_texels(
            probe_num_distance_interior_texels: u32
        );

        set_probe_hysteresis(probe_hysteresis: f32);
        set_probe_max_ray_distance(probe_max_ray_distance: f32);
        set_probe_normal_bias(probe_normal_bias: f32);
        set_probe_view_bias(probe_view_bias: f32);
        set_probe_distance_exponent(probe_distance_exponent: f32);

        set_probe_irradiance_encoding_gamma(
            probe_irradiance_encoding_gamma: f32
        );

        set_probe_irradiance_threshold(probe_irradiance_threshold: f32);
        set_probe_brightness_threshold(probe_brightness_threshold: f32);

        set_probe_random_ray_backface_threshold(
            probe_random_ray_backface_threshold: f32
        );

        set_probe_fixed_ray_backface_threshold(
            probe_fixed_ray_backface_threshold: f32
        );

        set_probe_min_frontface_distance(probe_min_frontface_distance: f32);
        set_probe_relocation_enabled(probe_relocation_enabled: bool);
        set_probe_classification_enabled(probe_classification_enabled: bool);
        set_probe_variability_enabled(probe_variability_enabled: bool);

        /// Switching to [`MovementType::Scrolling`] anchors the volume at its
        /// current origin; switching back bakes the scroll offsets into the
        /// origin.
        set_movement_type(movement_type: MovementType);

        set_probe_ray_data_format(probe_ray_data_format: RayDataFormat);
        set_probe_irradiance_format(probe_irradiance_format: IrradianceFormat);
        set_probe_distance_format(probe_distance_format: DistanceFormat);
        set_probe_data_format(probe_data_format: ProbeDataFormat);

        set_probe_variability_format(
            probe_variability_format: VariabilityFormat
        );

        set_insert_perf_markers(insert_perf_markers: bool);
        set_name(name: String);
    }

    /// Sets the point a scrolling volume follows; ignored by the default
    /// volumes (until they're switched to scrolling).
    pub fn set_scroll_anchor(&mut self, anchor: Vec3) -> Result<()> {
        for value in anchor.to_array() {
            if !value.is_finite() {
                return Err(ConfigError::OutOfRange {
                    field: "scroll_anchor",
                    value,
                });
            }
        }

        self.scroll.set_anchor(anchor);

        Ok(())
    }

    fn modify(&mut self, f: impl FnOnce(&mut VolumeDesc)) -> Result<()> {
        let mut desc = self.desc.clone();

        f(&mut desc);
        desc.validate()?;

        let prev = &self.desc;
        let origin_changed = desc.origin != prev.origin;

        let grid_changed = desc.probe_spacing != prev.probe_spacing
            || desc.probe_counts != prev.probe_counts;

        match (prev.movement_type, desc.movement_type) {
            (MovementType::Default, MovementType::Default) => {
                //
            }

            (MovementType::Default, MovementType::Scrolling) => {
                info!(
                    "Volume `{}` switched to scrolling; anchor={}",
                    desc.name, desc.origin
                );

                self.scroll.set_anchor(desc.origin);
                self.scroll.reset();
            }

            (MovementType::Scrolling, MovementType::Default) => {
                if !origin_changed {
                    desc.origin = self
                        .scroll
                        .effective_origin(prev.origin, prev.probe_spacing);
                }

                info!(
                    "Volume `{}` switched to default movement; origin={}",
                    desc.name, desc.origin
                );

                self.scroll.reset();
            }

            (MovementType::Scrolling, MovementType::Scrolling) => {
                if origin_changed {
                    self.scroll.set_anchor(desc.origin);
                    self.scroll.reset();
                } else if grid_changed {
                    // Offsets are expressed in the previous grid's probes
                    desc.origin = self
                        .scroll
                        .effective_origin(prev.origin, prev.probe_spacing);

                    self.scroll.reset();
                }
            }
        }

        if desc.rng_seed != prev.rng_seed {
            self.rng = StdRng::seed_from_u64(desc.rng_seed);
        }

        self.rotation = euler_angles_to_rotation_matrix(
            desc.euler_angles,
            EulerOrder::of(self.config.coordinate_system),
        );

        debug!("Volume reconfigured: {}", desc.describe());

        self.desc = desc;

        Ok(())
    }

    pub fn request_probe_relocation_reset(&mut self) {
        debug!("Volume `{}`: probe relocation reset requested", self.name());

        self.desc.probe_relocation_needs_reset = true;
    }

    /// Call once the reset dispatch has been submitted.
    pub fn acknowledge_probe_relocation_reset(&mut self) {
        self.desc.probe_relocation_needs_reset = false;
    }

    pub fn probe_relocation_needs_reset(&self) -> bool {
        self.desc.probe_relocation_needs_reset
    }

    pub fn request_probe_classification_reset(&mut self) {
        debug!(
            "Volume `{}`: probe classification reset requested",
            self.name()
        );

        self.desc.probe_classification_needs_reset = true;
    }

    /// Call once the reset dispatch has been submitted.
    pub fn acknowledge_probe_classification_reset(&mut self) {
        self.desc.probe_classification_needs_reset = false;
    }

    pub fn probe_classification_needs_reset(&self) -> bool {
        self.desc.probe_classification_needs_reset
    }

    /// Returns the grid's actual center, including scroll offsets.
    pub fn origin(&self) -> Vec3 {
        self.scroll
            .effective_origin(self.desc.origin, self.desc.probe_spacing)
    }

    pub fn rotation_matrix(&self) -> Mat3 {
        self.rotation
    }

    pub fn rotation_quaternion(&self) -> Quat {
        rotation_matrix_to_quaternion(self.rotation)
    }

    pub fn probe_ray_rotation_matrix(&self) -> Mat3 {
        self.probe_ray_rotation
    }

    pub fn probe_ray_rotation_quaternion(&self) -> Quat {
        rotation_matrix_to_quaternion(self.probe_ray_rotation)
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn num_probes(&self) -> u32 {
        self.desc.num_probes()
    }

    pub fn probe_counts(&self) -> UVec3 {
        self.desc.probe_counts
    }

    pub fn num_rays_per_probe(&self) -> u32 {
        self.desc.probe_num_rays
    }

    pub fn probe_grid(&self) -> gpu::ProbeGrid {
        gpu::ProbeGrid::new(
            self.desc.probe_counts,
            self.config.coordinate_system,
        )
    }

    pub fn probe_grid_coords(&self, probe_index: u32) -> UVec3 {
        self.probe_grid().coords(probe_index)
    }

    /// Returns world-space position of given probe, ignoring relocation.
    pub fn probe_world_position(&self, probe_index: u32) -> Vec3 {
        let grid = self.probe_grid();
        let coords = grid.coords(probe_index);

        let local = (grid.centered_coords(coords)
            + self.scroll.offsets().as_vec3())
            * self.desc.probe_spacing;

        self.desc.origin + self.rotation * local
    }

    /// Returns half of the grid's size; probes sit on the box's boundary.
    pub fn extent(&self) -> Vec3 {
        (self.desc.probe_counts.as_vec3() - 1.0) * self.desc.probe_spacing
            / 2.0
    }

    pub fn axis_aligned_bounding_box(&self) -> BoundingBox {
        OrientedBoundingBox::bound(self.origin(), self.rotation, self.extent())
    }

    pub fn oriented_bounding_box(&self) -> OrientedBoundingBox {
        OrientedBoundingBox {
            origin: self.origin(),
            rotation: self.rotation_quaternion(),
            extent: self.extent(),
        }
    }

    pub fn desc_gpu(&self) -> gpu::Volume {
        let desc = &self.desc;

        gpu::Volume {
            origin: desc.origin,
            rotation: self.rotation_quaternion().into(),
            probe_ray_rotation: self.probe_ray_rotation_quaternion().into(),
            movement_type: desc.movement_type.bits(),
            probe_spacing: desc.probe_spacing,
            probe_counts: desc.probe_counts,
            probe_num_rays: desc.probe_num_rays,
            probe_num_irradiance_interior_texels: desc
                .probe_num_irradiance_interior_texels,
            probe_num_distance_interior_texels: desc
                .probe_num_distance_interior_texels,
            probe_hysteresis: desc.probe_hysteresis,
            probe_max_ray_distance: desc.probe_max_ray_distance,
            probe_normal_bias: desc.probe_normal_bias,
            probe_view_bias: desc.probe_view_bias,
            probe_distance_exponent: desc.probe_distance_exponent,
            probe_irradiance_encoding_gamma: desc
                .probe_irradiance_encoding_gamma,
            probe_irradiance_threshold: desc.probe_irradiance_threshold,
            probe_brightness_threshold: desc.probe_brightness_threshold,
            probe_random_ray_backface_threshold: desc
                .probe_random_ray_backface_threshold,
            probe_fixed_ray_backface_threshold: desc
                .probe_fixed_ray_backface_threshold,
            probe_min_frontface_distance: desc.probe_min_frontface_distance,
            probe_scroll_offsets: self.scroll.offsets(),
            probe_scroll_clear: self.scroll.clear(),
            probe_scroll_directions: self.scroll.directions(),
            probe_ray_data_format: desc.probe_ray_data_format.bits(),
            probe_irradiance_format: desc.probe_irradiance_format.bits(),
            probe_relocation_enabled: desc.probe_relocation_enabled,
            probe_classification_enabled: desc.probe_classification_enabled,
            probe_variability_enabled: desc.probe_variability_enabled,
        }
    }

    pub fn desc_gpu_packed(&self) -> gpu::PackedVolume {
        let packed = self.desc_gpu().pack();

        debug_assert!(
            self.validate_packed(&packed),
            "packed record of volume `{}` doesn't match its state",
            self.name()
        );

        packed
    }

    /// Checks whether `packed` describes this volume, modulo the expected
    /// quantization of backface thresholds.
    pub fn validate_packed(&self, packed: &gpu::PackedVolume) -> bool {
        const EPSILON: f32 = 1.0 / 65535.0;

        let expected = self.desc_gpu();
        let actual = packed.unpack();

        let thresholds_match = (actual.probe_random_ray_backface_threshold
            - expected.probe_random_ray_backface_threshold)
            .abs()
            <= EPSILON
            && (actual.probe_fixed_ray_backface_threshold
                - expected.probe_fixed_ray_backface_threshold)
                .abs()
                <= EPSILON;

        thresholds_match
            && gpu::Volume {
                probe_random_ray_backface_threshold: expected
                    .probe_random_ray_backface_threshold,
                probe_fixed_ray_backface_threshold: expected
                    .probe_fixed_ray_backface_threshold,
                ..actual
            } == expected
    }

    /// Returns the number of rays to trace: one row of rays per probe, one
    /// array layer per horizontal slice of probes.
    pub fn ray_dispatch_dimensions(&self) -> UVec3 {
        let size = self.texture_dimensions(TextureKind::RayData);

        UVec3::new(size.width, size.height, size.depth_or_array_layers)
    }

    pub fn texture_dimensions(&self, kind: TextureKind) -> wgpu::Extent3d {
        kind.dimensions(&self.desc, self.config.coordinate_system)
    }

    pub fn texture_format(&self, kind: TextureKind) -> wgpu::TextureFormat {
        kind.format(&self.desc)
    }

    pub fn texture_descriptor(
        &self,
        kind: TextureKind,
    ) -> wgpu::TextureDescriptor<'static> {
        kind.descriptor(&self.desc, self.config.coordinate_system)
    }

    /// Estimates how much GPU memory this volume's textures and constants
    /// take.
    pub fn gpu_memory_used_in_bytes(&self) -> u64 {
        let desc = &self.desc;

        let irradiance_texels = desc.probe_num_irradiance_texels().pow(2);
        let distance_texels = desc.probe_num_distance_texels().pow(2);

        let variability_texels =
            desc.probe_num_irradiance_interior_texels.pow(2);

        let bytes_per_probe = (desc.probe_num_rays
            * desc.probe_ray_data_format.bytes_per_texel()
            + irradiance_texels * desc.probe_irradiance_format.bytes_per_texel()
            + distance_texels * desc.probe_distance_format.bytes_per_texel()
            + desc.probe_data_format.bytes_per_texel()
            + variability_texels
                * desc.probe_variability_format.bytes_per_texel())
            as u64;

        let variability_average = {
            let size = self.texture_dimensions(TextureKind::VariabilityAverage);

            (size.width * size.height * size.depth_or_array_layers) as u64
                * formats::VARIABILITY_AVERAGE_BYTES_PER_TEXEL as u64
        };

        self.num_probes() as u64 * bytes_per_probe
            + variability_average
            + std::mem::size_of::<gpu::PackedVolume>() as u64
    }

    pub fn root_constants(&self) -> gpu::RootConstants {
        gpu::RootConstants::new(self.desc.index)
    }
}

impl Drop for Volume {
    fn drop(&mut self) {
        info!("Deleting volume: `{}`", self.desc.name);
    }
}
