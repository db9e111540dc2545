use std::fmt::Debug;
use std::hash::Hash;

use derivative::Derivative;
use fxhash::FxHashMap;
use log::warn;

use crate::{gpu, ConfigError, Result, Volume};

/// Set of volumes sharing one constants buffer, addressed by application's
/// handles.
#[derive(Debug, Derivative)]
#[derivative(Default(bound = ""))]
pub struct Volumes<H>
where
    H: Clone + Debug + Eq + Hash,
{
    volumes: FxHashMap<H, Volume>,
}

impl<H> Volumes<H>
where
    H: Clone + Debug + Eq + Hash,
{
    /// Adds (or replaces) a volume; fails if its index is already taken by
    /// another handle.
    pub fn add(&mut self, handle: H, volume: Volume) -> Result<()> {
        let taken = self.volumes.iter().find(|(other_handle, other)| {
            **other_handle != handle && other.index() == volume.index()
        });

        if let Some((_, other)) = taken {
            return Err(ConfigError::DuplicateVolumeIndex {
                index: volume.index(),
                name: other.name().to_owned(),
            });
        }

        self.volumes.insert(handle, volume);

        Ok(())
    }

    pub fn remove(&mut self, handle: &H) -> Option<Volume> {
        self.volumes.remove(handle)
    }

    pub fn get(&self, handle: &H) -> Option<&Volume> {
        self.volumes.get(handle)
    }

    pub fn get_mut(&mut self, handle: &H) -> Option<&mut Volume> {
        self.volumes.get_mut(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&H, &Volume)> + '_ {
        self.volumes.iter()
    }

    pub fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (&H, &mut Volume)> + '_ {
        self.volumes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn update_all(&mut self) {
        for volume in self.volumes.values_mut() {
            volume.update();
        }
    }

    /// Returns packed records of all volumes, each at its volume's index;
    /// unused slots are zeroed.
    pub fn serialize(&self) -> Vec<gpu::PackedVolume> {
        let len = self
            .volumes
            .values()
            .map(|volume| volume.index() as usize + 1)
            .max()
            .unwrap_or_default();

        let mut records = vec![gpu::PackedVolume::default(); len];
        let mut taken = vec![false; len];

        for volume in self.volumes.values() {
            let index = volume.index() as usize;

            if taken[index] {
                warn!(
                    "Volume `{}` overwrites another volume at index {index}",
                    volume.name()
                );
            }

            records[index] = volume.desc_gpu_packed();
            taken[index] = true;
        }

        records
    }
}
