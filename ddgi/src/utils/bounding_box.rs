use glam::{vec3, Affine3A, Mat3, Quat, Vec3};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Returns the smallest box containing all eight corners of this one
    /// after they've been transformed.
    pub fn transformed(&self, transform: Affine3A) -> Self {
        let corners = (0..8).map(|i| {
            let corner = vec3(
                if i & 1 > 0 { self.max.x } else { self.min.x },
                if i & 2 > 0 { self.max.y } else { self.min.y },
                if i & 4 > 0 { self.max.z } else { self.min.z },
            );

            transform.transform_point3(corner)
        });

        let (min, max) = corners.fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), corner| (min.min(corner), max.max(corner)),
        );

        Self::new(min, max)
    }
}

/// Bounding box rotated around its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBoundingBox {
    pub origin: Vec3,
    pub rotation: Quat,

    /// Half of the box's size along each of its local axes.
    pub extent: Vec3,
}

impl OrientedBoundingBox {
    /// Returns the smallest axis-aligned box containing this one.
    pub fn axis_aligned(&self) -> BoundingBox {
        Self::bound(self.origin, Mat3::from_quat(self.rotation), self.extent)
    }

    pub(crate) fn bound(
        origin: Vec3,
        rotation: Mat3,
        extent: Vec3,
    ) -> BoundingBox {
        BoundingBox::new(-extent, extent)
            .transformed(Affine3A::from_mat3_translation(rotation, origin))
    }
}
