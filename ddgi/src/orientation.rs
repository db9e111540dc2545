use std::f32::consts::TAU;

use glam::{vec3, Mat3, Quat, Vec3};
use rand::Rng;

use crate::gpu;

/// Order in which Euler angles get applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EulerOrder {
    /// X, then Y, then Z; used by the Z-up conventions.
    Xyz,

    /// Y, then Z, then X; used by the Y-up conventions.
    Yzx,
}

impl EulerOrder {
    pub fn of(coordinate_system: gpu::CoordinateSystem) -> Self {
        if coordinate_system.is_z_up() {
            EulerOrder::Xyz
        } else {
            EulerOrder::Yzx
        }
    }
}

/// Builds rotation matrix out of intrinsic Euler angles (in radians).
pub fn euler_angles_to_rotation_matrix(
    angles: Vec3,
    order: EulerOrder,
) -> Mat3 {
    let x = Mat3::from_rotation_x(angles.x);
    let y = Mat3::from_rotation_y(angles.y);
    let z = Mat3::from_rotation_z(angles.z);

    match order {
        EulerOrder::Xyz => x * y * z,
        EulerOrder::Yzx => y * z * x,
    }
}

/// Converts a rotation matrix into a unit quaternion.
///
/// Picks the branch based on the trace or, when it's not positive, on the
/// largest diagonal element, so that we never divide by a tiny number.
pub fn rotation_matrix_to_quaternion(m: Mat3) -> Quat {
    // m(row, col)
    let m = |row: usize, col: usize| m.col(col)[row];
    let trace = m(0, 0) + m(1, 1) + m(2, 2);

    let (x, y, z, w) = if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();

        (
            (m(2, 1) - m(1, 2)) * s,
            (m(0, 2) - m(2, 0)) * s,
            (m(1, 0) - m(0, 1)) * s,
            0.25 / s,
        )
    } else if m(0, 0) > m(1, 1) && m(0, 0) > m(2, 2) {
        let s = 2.0 * (1.0 + m(0, 0) - m(1, 1) - m(2, 2)).sqrt();

        (
            0.25 * s,
            (m(0, 1) + m(1, 0)) / s,
            (m(0, 2) + m(2, 0)) / s,
            (m(2, 1) - m(1, 2)) / s,
        )
    } else if m(1, 1) > m(2, 2) {
        let s = 2.0 * (1.0 + m(1, 1) - m(0, 0) - m(2, 2)).sqrt();

        (
            (m(0, 1) + m(1, 0)) / s,
            0.25 * s,
            (m(1, 2) + m(2, 1)) / s,
            (m(0, 2) - m(2, 0)) / s,
        )
    } else {
        let s = 2.0 * (1.0 + m(2, 2) - m(0, 0) - m(1, 1)).sqrt();

        (
            (m(0, 2) + m(2, 0)) / s,
            (m(1, 2) + m(2, 1)) / s,
            0.25 * s,
            (m(1, 0) - m(0, 1)) / s,
        )
    };

    Quat::from_xyzw(x, y, z, w).normalize()
}

/// Draws a uniformly distributed rotation (Arvo, "Fast Random Rotation
/// Matrices", Graphics Gems III).
pub fn random_rotation(rng: &mut impl Rng) -> Mat3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = TAU * rng.gen::<f32>();
    let z = rng.gen::<f32>();

    // Householder vector
    let v = vec3(
        phi.cos() * z.sqrt(),
        phi.sin() * z.sqrt(),
        (1.0 - z).sqrt(),
    );
    let vvt = Mat3::from_cols(v * v.x, v * v.y, v * v.z);

    (vvt * 2.0 - Mat3::IDENTITY) * Mat3::from_rotation_z(theta)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_same_rotation(m: Mat3, q: Quat) {
        assert_relative_eq!(q.length(), 1.0, epsilon = EPSILON);

        for v in [Vec3::X, Vec3::Y, Vec3::Z, vec3(1.0, -2.0, 3.0)] {
            let expected = m * v;
            let actual = q * v;

            assert!(
                expected.abs_diff_eq(actual, EPSILON * 4.0),
                "m={m:?}, q={q:?}, v={v}: {expected} != {actual}"
            );
        }
    }

    #[test]
    fn quaternion_branches() {
        let cases = [
            // trace > 0
            Mat3::IDENTITY,
            Mat3::from_rotation_y(0.3),
            // largest diagonal: x
            Mat3::from_rotation_x(PI),
            // largest diagonal: y
            Mat3::from_rotation_y(PI),
            // largest diagonal: z
            Mat3::from_rotation_z(PI),
            Mat3::from_axis_angle(vec3(1.0, 1.0, 0.0).normalize(), 3.0),
        ];

        for m in cases {
            assert_same_rotation(m, rotation_matrix_to_quaternion(m));
        }
    }

    #[test]
    fn quaternion_matches_glam() {
        for angles in [
            vec3(0.1, 0.2, 0.3),
            vec3(-2.0, 1.0, 3.0),
            vec3(PI, 0.0, PI),
        ] {
            let m = euler_angles_to_rotation_matrix(angles, EulerOrder::Xyz);
            let actual = rotation_matrix_to_quaternion(m);
            let expected = Quat::from_mat3(&m);

            // q and -q describe the same rotation
            assert_relative_eq!(
                actual.dot(expected).abs(),
                1.0,
                epsilon = EPSILON
            );
        }
    }

    #[test]
    fn euler_angles() {
        for order in [EulerOrder::Xyz, EulerOrder::Yzx] {
            for angles in [
                Vec3::ZERO,
                vec3(0.5, -1.0, 2.0),
                // near gimbal lock
                vec3(0.3, FRAC_PI_2 - 1e-4, -0.7),
                vec3(FRAC_PI_2, FRAC_PI_2, FRAC_PI_2),
                vec3(-FRAC_PI_2 + 1e-4, 0.1, FRAC_PI_2 - 1e-4),
            ] {
                let m = euler_angles_to_rotation_matrix(angles, order);

                assert_relative_eq!(m.determinant(), 1.0, epsilon = EPSILON);
                assert_same_rotation(m, rotation_matrix_to_quaternion(m));
            }
        }
    }

    #[test]
    fn euler_order() {
        let angles = vec3(FRAC_PI_2, FRAC_PI_2, 0.0);

        let xyz = euler_angles_to_rotation_matrix(angles, EulerOrder::Xyz);
        let yzx = euler_angles_to_rotation_matrix(angles, EulerOrder::Yzx);

        // Rx * Ry maps +Z onto +X ...
        assert!((xyz * Vec3::Z).abs_diff_eq(vec3(1.0, 0.0, 0.0), EPSILON));

        // ... while Ry * Rx maps it onto -Y
        assert!((yzx * Vec3::Z).abs_diff_eq(vec3(0.0, -1.0, 0.0), EPSILON));

        assert_eq!(
            EulerOrder::Xyz,
            EulerOrder::of(gpu::CoordinateSystem::RightZUp)
        );

        assert_eq!(
            EulerOrder::Yzx,
            EulerOrder::of(gpu::CoordinateSystem::Left)
        );
    }

    #[test]
    fn random_rotations() {
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..64 {
            let m = random_rotation(&mut rng);

            assert_relative_eq!(m.determinant(), 1.0, epsilon = EPSILON);

            assert!((m * m.transpose()).abs_diff_eq(Mat3::IDENTITY, EPSILON));
            assert_same_rotation(m, rotation_matrix_to_quaternion(m));
        }
    }

    #[test]
    fn random_rotations_are_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        for _ in 0..8 {
            assert_eq!(random_rotation(&mut a), random_rotation(&mut b));
        }
    }
}
