//! Flies a camera through a scene covered by two volumes - a static one and
//! a scrolling one that follows the camera - and prints what would get
//! uploaded and dispatched each frame.
//!
//! Run with `RUST_LOG=debug` to see the scroll steps.

use std::error::Error;

use ddgi::{
    classify_volume_probes, gpu, relocate_volume_probes,
    update_volume_probes, CommandRecorder, Config, Kernel, MovementType,
    TextureKind, Volume, VolumeDesc, Volumes,
};
use glam::{uvec3, vec3, UVec3, Vec3};
use log::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Handle {
    Room,
    Camera,
}

#[derive(Default)]
struct Recorder {
    depth: usize,
    dispatches: usize,
}

impl CommandRecorder for Recorder {
    fn begin_marker(&mut self, label: &str) {
        println!("{:indent$}> {label}", "", indent = 2 * self.depth);
        self.depth += 1;
    }

    fn end_marker(&mut self) {
        self.depth -= 1;
    }

    fn set_constants(&mut self, constants: gpu::RootConstants) {
        println!(
            "{:indent$}constants: {:?}",
            "",
            constants.data(),
            indent = 2 * self.depth
        );
    }

    fn dispatch(&mut self, kernel: Kernel, groups: UVec3) {
        println!(
            "{:indent$}dispatch: {kernel:?} {groups}",
            "",
            indent = 2 * self.depth
        );

        self.dispatches += 1;
    }

    fn barrier(&mut self) {
        println!("{:indent$}barrier", "", indent = 2 * self.depth);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::default();
    let mut volumes = Volumes::default();

    volumes.add(
        Handle::Room,
        Volume::new(
            config,
            VolumeDesc {
                name: "room".into(),
                index: 0,
                origin: vec3(0.0, 0.0, 2.0),
                euler_angles: vec3(0.0, 0.0, 0.3),
                probe_counts: uvec3(12, 8, 4),
                probe_spacing: vec3(1.0, 1.0, 1.5),
                probe_relocation_enabled: true,
                probe_relocation_needs_reset: true,
                ..Default::default()
            },
        )?,
    )?;

    volumes.add(
        Handle::Camera,
        Volume::new(
            config,
            VolumeDesc {
                name: "camera".into(),
                index: 1,
                rng_seed: 1,
                movement_type: MovementType::Scrolling,
                probe_counts: uvec3(16, 16, 8),
                probe_spacing: Vec3::splat(2.0),
                probe_classification_enabled: true,
                probe_classification_needs_reset: true,
                ..Default::default()
            },
        )?,
    )?;

    for (handle, volume) in volumes.iter() {
        info!(
            "{handle:?}: {} probes, {} rays, {:.2} MiB",
            volume.num_probes(),
            volume.ray_dispatch_dimensions(),
            volume.gpu_memory_used_in_bytes() as f32 / 1024.0 / 1024.0
        );

        for kind in TextureKind::ALL {
            let size = volume.texture_dimensions(kind);

            info!(
                "  {}: {}x{}x{} ({:?})",
                kind.label(),
                size.width,
                size.height,
                size.depth_or_array_layers,
                volume.texture_format(kind)
            );
        }
    }

    for frame in 0..8 {
        let camera = vec3(frame as f32 * 1.5, 0.5 * frame as f32, 1.0);

        println!("-- frame {frame}, camera at {camera}");

        if let Some(volume) = volumes.get_mut(&Handle::Camera) {
            volume.set_scroll_anchor(camera)?;
        }

        volumes.update_all();

        let records = volumes.serialize();
        let bytes: &[u8] = bytemuck::cast_slice(&records);

        println!("uploading {} bytes of volume records", bytes.len());

        let mut recorder = Recorder::default();

        let (relocated, classified) = {
            let active: Vec<_> = volumes.iter().map(|(_, v)| v).collect();

            update_volume_probes(&mut recorder, &active);

            (
                relocate_volume_probes(&mut recorder, &active),
                classify_volume_probes(&mut recorder, &active),
            )
        };

        // (here the commands would get submitted)

        for (_, volume) in volumes.iter_mut() {
            if relocated.contains(&volume.index()) {
                volume.acknowledge_probe_relocation_reset();
            }

            if classified.contains(&volume.index()) {
                volume.acknowledge_probe_classification_reset();
            }
        }

        if let Some(volume) = volumes.get(&Handle::Camera) {
            println!(
                "camera volume: origin={}, offsets={}, clear={:?}",
                volume.origin(),
                volume.scroll().offsets(),
                volume.scroll().clear()
            );
        }

        println!("{} dispatches", recorder.dispatches);
    }

    Ok(())
}
