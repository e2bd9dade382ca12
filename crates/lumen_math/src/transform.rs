// Rotation utilities for DMat3
//
// Extends glam::DMat3 with the around-a-center helpers used by scene
// transforms. glam already provides mul_vec3(), transpose() and inverse().

use crate::{Aabb, DMat3, DVec3};

/// Extension trait for rotation matrices.
pub trait RotationExt {
    /// Rotate a point around `center`.
    fn rotate_around(&self, point: DVec3, center: DVec3) -> DVec3;

    /// Bounding box of all 8 corners of `aabb` rotated around `center`.
    fn transform_aabb(&self, aabb: &Aabb, center: DVec3) -> Aabb;
}

impl RotationExt for DMat3 {
    fn rotate_around(&self, point: DVec3, center: DVec3) -> DVec3 {
        *self * (point - center) + center
    }

    fn transform_aabb(&self, aabb: &Aabb, center: DVec3) -> Aabb {
        Aabb::from_point_cloud(
            aabb.corners()
                .iter()
                .map(|&corner| self.rotate_around(corner, center)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_rotate_around_identity() {
        let point = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(DMat3::IDENTITY.rotate_around(point, DVec3::ONE), point);
    }

    #[test]
    fn test_rotate_around_center() {
        // 90 degrees around Z, pivoting on (1, 0, 0)
        let rotation = DMat3::from_rotation_z(PI / 2.0);
        let rotated = rotation.rotate_around(DVec3::new(2.0, 0.0, 0.0), DVec3::X);

        assert!((rotated - DVec3::new(1.0, 1.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_transform_aabb_rotation_refits() {
        let rotation = DMat3::from_rotation_z(PI / 4.0);
        let aabb = Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0));
        let rotated = rotation.transform_aabb(&aabb, DVec3::ZERO);

        let half_diagonal = 2.0_f64.sqrt();
        assert!((rotated.x.max - half_diagonal).abs() < 1e-9);
        assert!((rotated.y.min + half_diagonal).abs() < 1e-9);
        assert!((rotated.z.max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_inverse_round_trip() {
        let rotation = DMat3::from_rotation_y(PI / 4.0);
        let center = DVec3::new(3.0, 0.0, -1.0);
        let point = DVec3::new(5.0, 3.0, 2.0);

        let there = rotation.rotate_around(point, center);
        let back = rotation.transpose().rotate_around(there, center);

        assert!((back - point).length() < 1e-9);
    }
}
