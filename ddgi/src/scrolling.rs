use glam::{IVec3, UVec3, Vec3};

/// Bookkeeping of an infinite-scrolling volume.
///
/// Instead of moving the probes, a scrolling volume shifts its grid by whole
/// probes towards the anchor and lets the shaders recycle the probe planes
/// that fell behind; `offsets` tell the shaders how far the grid has moved
/// (modulo the probe counts), `clear` tells them which planes have to be
/// reset during this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    anchor: Vec3,
    offsets: IVec3,
    directions: [bool; 3],
    clear: [bool; 3],
}

impl ScrollState {
    pub fn new(anchor: Vec3) -> Self {
        Self {
            anchor,
            ..Default::default()
        }
    }

    /// Point the volume is trying to follow.
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Number of whole probes the grid has been shifted by, per axis.
    pub fn offsets(&self) -> IVec3 {
        self.offsets
    }

    /// Direction of the last shift, per axis (`true` = positive).
    pub fn directions(&self) -> [bool; 3] {
        self.directions
    }

    /// Axes which got shifted during the last update.
    pub fn clear(&self) -> [bool; 3] {
        self.clear
    }

    /// Returns where the grid's center actually is, given its unscrolled
    /// origin.
    pub fn effective_origin(&self, origin: Vec3, spacing: Vec3) -> Vec3 {
        origin + self.offsets.as_vec3() * spacing
    }

    pub(crate) fn set_anchor(&mut self, anchor: Vec3) {
        self.anchor = anchor;
    }

    /// Forgets all shifts (e.g. after they've been baked into the origin).
    pub(crate) fn reset(&mut self) {
        self.offsets = IVec3::ZERO;
        self.directions = Default::default();
        self.clear = Default::default();
    }

    /// Shifts the grid by as many whole probes as needed to get it within a
    /// probe of the anchor; returns the shift.
    ///
    /// Whenever an offset grows to a multiple of the probe count on its
    /// axis, that multiple gets folded into `origin`; this keeps the offsets
    /// bounded without moving any probe or changing which texel a probe is
    /// stored at.
    pub(crate) fn step(
        &mut self,
        origin: &mut Vec3,
        spacing: Vec3,
        counts: UVec3,
    ) -> IVec3 {
        self.clear = Default::default();

        let translation = self.anchor - self.effective_origin(*origin, spacing);

        // Float-to-int casts truncate towards zero, which is what we want:
        // the grid follows the anchor only once it's a whole probe away.
        // They also saturate, so a far-away anchor gets reached over a few
        // updates instead of at once.
        let shift = (translation / spacing).as_ivec3();

        for axis in 0..3 {
            if shift[axis] == 0 {
                continue;
            }

            self.directions[axis] = shift[axis] > 0;
            self.clear[axis] = true;

            // Saturated shifts overflow `i32` when added to the offsets
            let offset = self.offsets[axis] as i64 + shift[axis] as i64;
            let count = counts[axis] as i64;
            let folded = offset / count * count;

            self.offsets[axis] = (offset - folded) as i32;

            if folded != 0 {
                origin[axis] += folded as f32 * spacing[axis];
            }
        }

        shift
    }
}
