//! Vector math, convex solids and line crossings for the lumen raytracer.

pub use glam::*;

mod aabb;
mod convex;
mod interval;
mod ray;
mod shapes;
mod transform;

pub use aabb::Aabb;
pub use convex::{
    Convex, ConvexLineResult, Line, LineCrossing, PointNormal, Span, SurfaceCrossing,
};
pub use interval::Interval;
pub use ray::{LineSegment, Ray};
pub use shapes::{BoundingSphere, Cube, Cylinder, Disk, Ellipsoid, Hyperplane, Plane, Sphere, Torus};
pub use transform::RotationExt;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glam_reexport_is_f64() {
        let v: DVec3 = DVec3::new(1.0, 2.0, 2.0);
        assert_eq!(v.length(), 3.0);
    }

    #[test]
    fn test_segment_line_matches_ray_line() {
        let segment = LineSegment::new(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let sphere = Sphere::new(DVec3::new(20.0, 0.0, 0.0), 1.0);

        assert!(matches!(
            sphere.intersection(&Line::from_ray(&ray)),
            ConvexLineResult::EnterExit(_, _)
        ));
        assert_eq!(
            sphere.intersection(&Line::from_segment(&segment)),
            ConvexLineResult::NoIntersection
        );
    }
}
