use crate::{Aabb, DMat3, DVec3, RotationExt};

/// A half-infinite line starting at `start` and traveling along `direction`.
///
/// The direction is normalized on construction, so parameters along the ray
/// are world-space distances.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub start: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray. A zero-length direction stays zero and intersects nothing.
    pub fn new(start: DVec3, direction: DVec3) -> Self {
        Self {
            start,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: start + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.start + self.direction * t
    }

    /// Point at `magnitude` units of distance from the start of the ray.
    #[inline]
    pub fn projected_magnitude(&self, magnitude: f64) -> DVec3 {
        self.at(magnitude)
    }

    /// Shift the ray in space by `offset`.
    pub fn translated(&self, offset: DVec3) -> Ray {
        Ray {
            start: self.start + offset,
            direction: self.direction,
        }
    }

    /// Uniformly scale the ray start around `center`; the direction is unchanged.
    pub fn scaled_around(&self, factor: f64, center: DVec3) -> Ray {
        Ray {
            start: (self.start - center) * factor + center,
            direction: self.direction,
        }
    }

    /// Rotate the ray around `center` by `rotation`.
    pub fn rotated_around(&self, rotation: &DMat3, center: DVec3) -> Ray {
        Ray::new(
            rotation.rotate_around(self.start, center),
            *rotation * self.direction,
        )
    }
}

/// A finite line between two points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineSegment {
    pub start: DVec3,
    pub end: DVec3,
}

impl LineSegment {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end, zero for degenerate segments.
    pub fn direction(&self) -> DVec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Bounding box of both end points.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.start, self.end)
    }

    pub fn translated(&self, offset: DVec3) -> LineSegment {
        LineSegment::new(self.start + offset, self.end + offset)
    }

    pub fn scaled_around(&self, factor: f64, center: DVec3) -> LineSegment {
        LineSegment::new(
            (self.start - center) * factor + center,
            (self.end - center) * factor + center,
        )
    }

    pub fn rotated_around(&self, rotation: &DMat3, center: DVec3) -> LineSegment {
        LineSegment::new(
            rotation.rotate_around(self.start, center),
            rotation.rotate_around(self.end, center),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);
        assert!((ray.direction - DVec3::new(0.0, 0.6, 0.8)).length() < 1e-12);
    }

    #[test]
    fn test_ray_zero_direction_stays_zero() {
        let ray = Ray::new(DVec3::ONE, DVec3::ZERO);
        assert_eq!(ray.direction, DVec3::ZERO);
        assert_eq!(ray.at(10.0), DVec3::ONE);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);

        assert_eq!(ray.at(0.0), DVec3::ZERO);
        assert_eq!(ray.at(2.0), DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.projected_magnitude(-1.0), DVec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_scaled_keeps_direction() {
        let ray = Ray::new(DVec3::new(2.0, 0.0, 0.0), DVec3::Y);
        let scaled = ray.scaled_around(0.5, DVec3::ZERO);

        assert_eq!(scaled.start, DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(scaled.direction, DVec3::Y);
    }

    #[test]
    fn test_segment_bounds_and_length() {
        let segment = LineSegment::new(DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0));
        assert_eq!(segment.length(), 5.0);

        let bounds = segment.bounds();
        assert_eq!(bounds.x.max, 3.0);
        assert_eq!(bounds.y.max, 4.0);
    }
}
