//! Recording of the per-frame probe passes.
//!
//! Pipelines and bindings are owned by the graphics layer; here we only
//! decide which kernels run, for which volumes, with how many workgroups.
//!
//! Perf markers follow each volume's [`crate::Config`]: group markers get
//! recorded when any of the volumes asks for them, per-volume markers when
//! that volume's config and its desc both do.

use glam::{uvec3, UVec3};

use crate::{gpu, Volume};

/// Number of probes handled by a single relocation / classification
/// workgroup.
pub const PROBES_PER_GROUP: u32 = 32;

/// Side of a (square) border-update workgroup.
pub const BORDER_GROUP_SIZE: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    BlendIrradiance,
    BlendDistance,
    IrradianceBorderRows,
    IrradianceBorderColumns,
    DistanceBorderRows,
    DistanceBorderColumns,
    RelocationReset,
    Relocation,
    ClassificationReset,
    Classification,
}

/// Command-buffer-like sink the passes are recorded into.
pub trait CommandRecorder {
    fn begin_marker(&mut self, label: &str);

    fn end_marker(&mut self);

    /// Sets the root (push) constants used by the following dispatches.
    fn set_constants(&mut self, constants: gpu::RootConstants);

    fn dispatch(&mut self, kernel: Kernel, groups: UVec3);

    /// Makes the following dispatches see everything written so far.
    fn barrier(&mut self) {}
}

/// Records probe blending (irradiance, then distance) and border updates
/// for given volumes.
pub fn update_volume_probes(
    recorder: &mut impl CommandRecorder,
    volumes: &[&Volume],
) {
    let mut markers = Markers::new(recorder, volumes);

    markers.begin("DDGI Update Probes");

    for (label, kernel) in [
        ("Irradiance", Kernel::BlendIrradiance),
        ("Distance", Kernel::BlendDistance),
    ] {
        markers.begin(&format!("Probe {label}"));

        for volume in volumes {
            let probes = texture_probe_counts(volume);

            markers.recorder.set_constants(volume.root_constants());
            markers.begin_volume(label, volume);
            markers.recorder.dispatch(kernel, probes);
            markers.end_volume(volume);
        }

        markers.end();
    }

    if !volumes.is_empty() {
        markers.recorder.barrier();
    }

    markers.begin("Probe Borders");

    for volume in volumes {
        let probes = texture_probe_counts(volume);

        markers.recorder.set_constants(volume.root_constants());
        markers.begin_volume("Borders", volume);

        for (texels, rows, columns) in [
            (
                volume.desc().probe_num_irradiance_texels(),
                Kernel::IrradianceBorderRows,
                Kernel::IrradianceBorderColumns,
            ),
            (
                volume.desc().probe_num_distance_texels(),
                Kernel::DistanceBorderRows,
                Kernel::DistanceBorderColumns,
            ),
        ] {
            markers.recorder.dispatch(
                rows,
                border_groups(probes.x * texels, probes.y, probes.z),
            );

            markers.recorder.dispatch(
                columns,
                border_groups(probes.x, probes.y * texels, probes.z),
            );
        }

        markers.end_volume(volume);
    }

    if !volumes.is_empty() {
        markers.recorder.barrier();
    }

    markers.end();
    markers.end();
}

/// Records probe relocation: first the reset pass for volumes which
/// requested it, then the relocation pass for volumes which have it
/// enabled.
///
/// Returns indices of volumes whose reset got recorded; acknowledge them
/// (see [`Volume::acknowledge_probe_relocation_reset()`]) once the commands
/// are submitted.
pub fn relocate_volume_probes(
    recorder: &mut impl CommandRecorder,
    volumes: &[&Volume],
) -> Vec<u32> {
    schedule_per_probe_passes(
        recorder,
        volumes,
        "DDGI Relocate Probes",
        (Kernel::RelocationReset, Volume::probe_relocation_needs_reset),
        (Kernel::Relocation, |volume: &Volume| {
            volume.desc().probe_relocation_enabled
        }),
    )
}

/// Records probe classification; see [`relocate_volume_probes()`].
pub fn classify_volume_probes(
    recorder: &mut impl CommandRecorder,
    volumes: &[&Volume],
) -> Vec<u32> {
    schedule_per_probe_passes(
        recorder,
        volumes,
        "DDGI Classify Probes",
        (
            Kernel::ClassificationReset,
            Volume::probe_classification_needs_reset,
        ),
        (Kernel::Classification, |volume: &Volume| {
            volume.desc().probe_classification_enabled
        }),
    )
}

fn schedule_per_probe_passes(
    recorder: &mut impl CommandRecorder,
    volumes: &[&Volume],
    label: &str,
    (reset_kernel, needs_reset): (Kernel, fn(&Volume) -> bool),
    (kernel, is_enabled): (Kernel, fn(&Volume) -> bool),
) -> Vec<u32> {
    let mut markers = Markers::new(recorder, volumes);
    let mut reset = Vec::new();

    markers.begin(label);

    for volume in volumes.iter().filter(|volume| needs_reset(volume)) {
        markers.recorder.set_constants(volume.root_constants());
        markers
            .recorder
            .dispatch(reset_kernel, per_probe_groups(volume));

        reset.push(volume.index());
    }

    if !reset.is_empty() {
        markers.recorder.barrier();
    }

    let mut dispatched = false;

    for volume in volumes.iter().filter(|volume| is_enabled(volume)) {
        markers.recorder.set_constants(volume.root_constants());
        markers.recorder.dispatch(kernel, per_probe_groups(volume));

        dispatched = true;
    }

    if dispatched {
        markers.recorder.barrier();
    }

    markers.end();

    reset
}

fn texture_probe_counts(volume: &Volume) -> UVec3 {
    volume
        .config()
        .coordinate_system
        .texture_probe_counts(volume.probe_counts())
}

fn per_probe_groups(volume: &Volume) -> UVec3 {
    uvec3(volume.num_probes().div_ceil(PROBES_PER_GROUP), 1, 1)
}

fn border_groups(threads_x: u32, threads_y: u32, layers: u32) -> UVec3 {
    uvec3(
        threads_x.div_ceil(BORDER_GROUP_SIZE),
        threads_y.div_ceil(BORDER_GROUP_SIZE),
        layers,
    )
}

/// Perf markers; see the module's docs for when they get recorded.
struct Markers<'a, R> {
    recorder: &'a mut R,
    enabled: bool,
}

impl<'a, R> Markers<'a, R>
where
    R: CommandRecorder,
{
    fn new(recorder: &'a mut R, volumes: &[&Volume]) -> Self {
        Self {
            recorder,
            enabled: volumes
                .iter()
                .any(|volume| volume.config().insert_perf_markers),
        }
    }

    fn begin(&mut self, label: &str) {
        if self.enabled {
            self.recorder.begin_marker(label);
        }
    }

    fn end(&mut self) {
        if self.enabled {
            self.recorder.end_marker();
        }
    }

    fn begin_volume(&mut self, label: &str, volume: &Volume) {
        if Self::is_enabled_for(volume) {
            self.recorder.begin_marker(&format!(
                "{label}, Volume[{}] - \"{}\"",
                volume.index(),
                volume.name()
            ));
        }
    }

    fn end_volume(&mut self, volume: &Volume) {
        if Self::is_enabled_for(volume) {
            self.recorder.end_marker();
        }
    }

    fn is_enabled_for(volume: &Volume) -> bool {
        volume.config().insert_perf_markers && volume.desc().insert_perf_markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, VolumeDesc};

    #[derive(Clone, Debug, PartialEq)]
    enum Command {
        Begin(String),
        End,
        Constants(u32),
        Dispatch(Kernel, UVec3),
        Barrier,
    }

    #[derive(Default)]
    struct Recorder {
        commands: Vec<Command>,
    }

    impl Recorder {
        fn dispatches(&self) -> Vec<(Kernel, UVec3)> {
            self.commands
                .iter()
                .filter_map(|command| match command {
                    Command::Dispatch(kernel, groups) => {
                        Some((*kernel, *groups))
                    }
                    _ => None,
                })
                .collect()
        }

        fn markers(&self) -> Vec<&str> {
            self.commands
                .iter()
                .filter_map(|command| match command {
                    Command::Begin(label) => Some(label.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn is_balanced(&self) -> bool {
            let mut depth = 0;

            for command in &self.commands {
                match command {
                    Command::Begin(_) => depth += 1,
                    Command::End if depth == 0 => return false,
                    Command::End => depth -= 1,
                    _ => (),
                }
            }

            depth == 0
        }
    }

    impl CommandRecorder for Recorder {
        fn begin_marker(&mut self, label: &str) {
            self.commands.push(Command::Begin(label.into()));
        }

        fn end_marker(&mut self) {
            self.commands.push(Command::End);
        }

        fn set_constants(&mut self, constants: gpu::RootConstants) {
            self.commands.push(Command::Constants(constants.volume_index));
        }

        fn dispatch(&mut self, kernel: Kernel, groups: UVec3) {
            self.commands.push(Command::Dispatch(kernel, groups));
        }

        fn barrier(&mut self) {
            self.commands.push(Command::Barrier);
        }
    }

    fn volume(desc: VolumeDesc) -> Volume {
        Volume::new(Config::default(), desc).unwrap()
    }

    #[test]
    fn update_probes() {
        let a = volume(VolumeDesc {
            name: "a".into(),
            index: 0,
            probe_counts: uvec3(4, 5, 6),
            ..Default::default()
        });

        let b = volume(VolumeDesc {
            name: "b".into(),
            index: 1,
            insert_perf_markers: false,
            ..Default::default()
        });

        let mut recorder = Recorder::default();

        update_volume_probes(&mut recorder, &[&a, &b]);

        assert!(recorder.is_balanced());

        assert_eq!(
            vec![
                (Kernel::BlendIrradiance, uvec3(4, 5, 6)),
                (Kernel::BlendIrradiance, uvec3(8, 8, 8)),
                (Kernel::BlendDistance, uvec3(4, 5, 6)),
                (Kernel::BlendDistance, uvec3(8, 8, 8)),
                // 4 * 8 / 8, ceil(5 / 8)
                (Kernel::IrradianceBorderRows, uvec3(4, 1, 6)),
                (Kernel::IrradianceBorderColumns, uvec3(1, 5, 6)),
                // 4 * 16 / 8, ceil(5 / 8)
                (Kernel::DistanceBorderRows, uvec3(8, 1, 6)),
                (Kernel::DistanceBorderColumns, uvec3(1, 10, 6)),
                (Kernel::IrradianceBorderRows, uvec3(8, 1, 8)),
                (Kernel::IrradianceBorderColumns, uvec3(1, 8, 8)),
                (Kernel::DistanceBorderRows, uvec3(16, 1, 8)),
                (Kernel::DistanceBorderColumns, uvec3(1, 16, 8)),
            ],
            recorder.dispatches()
        );

        assert_eq!(
            vec![
                "DDGI Update Probes",
                "Probe Irradiance",
                "Irradiance, Volume[0] - \"a\"",
                "Probe Distance",
                "Distance, Volume[0] - \"a\"",
                "Probe Borders",
                "Borders, Volume[0] - \"a\"",
            ],
            recorder.markers()
        );

        // Constants are set before each volume's dispatches
        assert_eq!(Command::Constants(0), recorder.commands[2]);
    }

    #[test]
    fn update_probes_without_markers() {
        let config = Config {
            insert_perf_markers: false,
            ..Default::default()
        };

        let a = Volume::new(config, VolumeDesc::default()).unwrap();
        let mut recorder = Recorder::default();

        update_volume_probes(&mut recorder, &[&a]);

        assert!(recorder.markers().is_empty());
        assert!(recorder.is_balanced());
        assert_eq!(6, recorder.dispatches().len());
    }

    #[test]
    fn markers_follow_each_volume_config() {
        let config = Config {
            insert_perf_markers: false,
            ..Default::default()
        };

        let a = Volume::new(
            config,
            VolumeDesc {
                name: "a".into(),
                index: 0,
                ..Default::default()
            },
        )
        .unwrap();

        let b = volume(VolumeDesc {
            name: "b".into(),
            index: 1,
            ..Default::default()
        });

        let mut recorder = Recorder::default();

        update_volume_probes(&mut recorder, &[&a, &b]);

        assert!(recorder.is_balanced());

        assert_eq!(
            vec![
                "DDGI Update Probes",
                "Probe Irradiance",
                "Irradiance, Volume[1] - \"b\"",
                "Probe Distance",
                "Distance, Volume[1] - \"b\"",
                "Probe Borders",
                "Borders, Volume[1] - \"b\"",
            ],
            recorder.markers()
        );
    }

    #[test]
    fn blending_follows_coordinate_system() {
        let a = Volume::new(
            Config {
                coordinate_system: gpu::CoordinateSystem::Right,
                ..Default::default()
            },
            VolumeDesc {
                probe_counts: uvec3(2, 3, 4),
                ..Default::default()
            },
        )
        .unwrap();

        let mut recorder = Recorder::default();

        update_volume_probes(&mut recorder, &[&a]);

        assert_eq!(
            (Kernel::BlendIrradiance, uvec3(2, 4, 3)),
            recorder.dispatches()[0]
        );
    }

    #[test]
    fn relocate_probes() {
        let mut a = volume(VolumeDesc {
            index: 0,
            probe_counts: uvec3(4, 4, 4),
            probe_relocation_enabled: true,
            ..Default::default()
        });

        let b = volume(VolumeDesc {
            index: 1,
            probe_counts: uvec3(10, 10, 10),
            probe_relocation_enabled: true,
            ..Default::default()
        });

        let c = volume(VolumeDesc {
            index: 2,
            ..Default::default()
        });

        a.request_probe_relocation_reset();

        let mut recorder = Recorder::default();

        let reset = relocate_volume_probes(&mut recorder, &[&a, &b, &c]);

        assert_eq!(vec![0], reset);
        assert!(recorder.is_balanced());

        assert_eq!(
            vec![
                (Kernel::RelocationReset, uvec3(2, 1, 1)),
                (Kernel::Relocation, uvec3(2, 1, 1)),
                // ceil(1000 / 32)
                (Kernel::Relocation, uvec3(32, 1, 1)),
            ],
            recorder.dispatches()
        );

        assert_eq!(
            2,
            recorder
                .commands
                .iter()
                .filter(|command| **command == Command::Barrier)
                .count()
        );

        // Recording doesn't acknowledge anything on its own
        assert!(a.probe_relocation_needs_reset());

        for index in reset {
            assert_eq!(0, index);
            a.acknowledge_probe_relocation_reset();
        }

        let mut recorder = Recorder::default();
        let reset = relocate_volume_probes(&mut recorder, &[&a]);

        assert!(reset.is_empty());
        assert_eq!(
            vec![(Kernel::Relocation, uvec3(2, 1, 1))],
            recorder.dispatches()
        );
    }

    #[test]
    fn classify_probes() {
        let mut a = volume(VolumeDesc {
            index: 5,
            probe_classification_enabled: false,
            ..Default::default()
        });

        a.request_probe_classification_reset();

        let mut recorder = Recorder::default();

        let reset = classify_volume_probes(&mut recorder, &[&a]);

        assert_eq!(vec![5], reset);

        assert_eq!(
            vec![(Kernel::ClassificationReset, uvec3(16, 1, 1))],
            recorder.dispatches()
        );

        assert_eq!(vec!["DDGI Classify Probes"], recorder.markers());
    }

    #[test]
    fn empty() {
        let mut recorder = Recorder::default();

        update_volume_probes(&mut recorder, &[]);

        assert!(recorder.dispatches().is_empty());
        assert!(recorder.is_balanced());
        assert!(!recorder.commands.contains(&Command::Barrier));
    }
}
