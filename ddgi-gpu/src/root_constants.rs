use bytemuck::{Pod, Zeroable};

/// Per-dispatch constants (push constants / root constants) telling a
/// kernel which volume it's working on.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RootConstants {
    /// Index of the volume's record within the packed-volumes buffer.
    pub volume_index: u32,

    /// Offset of the volume's first writable texture in the bindless
    /// descriptor heap.
    pub uav_offset: u32,

    /// Offset of the volume's first read-only texture in the bindless
    /// descriptor heap.
    pub srv_offset: u32,

    pub _pad0: u32,
}

impl RootConstants {
    /// Number of meaningful 32-bit values (i.e. excluding padding).
    pub const NUM_32BIT_VALUES: u32 = 3;

    pub fn new(volume_index: u32) -> Self {
        Self {
            volume_index,
            ..Default::default()
        }
    }

    pub fn with_offsets(mut self, uav_offset: u32, srv_offset: u32) -> Self {
        self.uav_offset = uav_offset;
        self.srv_offset = srv_offset;
        self
    }

    /// Returns the meaningful values, ready to be pushed.
    pub fn data(&self) -> [u32; 3] {
        [self.volume_index, self.uav_offset, self.srv_offset]
    }
}
