use crate::convex::{Convex, Line, Span};
use crate::{DVec3, Interval};

/// Axis-aligned box, used both as a solid shape and for culling.
///
/// Boxes built from points are padded so no side is thinner than
/// [`Aabb::MIN_THICKNESS`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Contains nothing; `union` with it is the identity.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const MIN_THICKNESS: f64 = 0.0001;

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }.padded_to_minimum()
    }

    /// Box spanning two opposite corners, in any order.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Smallest box containing every point; `EMPTY` for no points.
    pub fn from_point_cloud(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Aabb::EMPTY;
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Aabb::from_points(min, max)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            x: self.x.hull(&other.x),
            y: self.y.hull(&other.y),
            z: self.z.hull(&other.z),
        }
    }

    /// Range along axis 0 (X), 1 (Y) or 2 (Z).
    pub fn axis(&self, axis: usize) -> Interval {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn minimum(&self) -> DVec3 {
        DVec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn maximum(&self) -> DVec3 {
        DVec3::new(self.x.max, self.y.max, self.z.max)
    }

    pub fn size(&self) -> DVec3 {
        self.maximum() - self.minimum()
    }

    pub fn center(&self) -> DVec3 {
        (self.minimum() + self.maximum()) * 0.5
    }

    pub fn corners(&self) -> [DVec3; 8] {
        let (min, max) = (self.minimum(), self.maximum());
        [
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, min.y, max.z),
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(min.x, max.y, max.z),
            DVec3::new(max.x, max.y, max.z),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Returns true if two boxes share any point.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !self.x.intersect(&other.x).is_empty()
            && !self.y.intersect(&other.y).is_empty()
            && !self.z.intersect(&other.z).is_empty()
    }

    /// Returns true if a ray or line segment passes through this box.
    pub fn intersects_line(&self, line: &Line) -> bool {
        if line.is_degenerate() {
            return self.contains(line.start);
        }
        self.span(line)
            .is_some_and(|span| !matches!(span.classify(line), crate::ConvexLineResult::NoIntersection))
    }

    fn padded_to_minimum(mut self) -> Self {
        for range in [&mut self.x, &mut self.y, &mut self.z] {
            if range.size() < Self::MIN_THICKNESS {
                *range = range.padded(Self::MIN_THICKNESS);
            }
        }
        self
    }

    pub fn translate(&self, offset: DVec3) -> Aabb {
        Aabb::new(
            self.x.offset(offset.x),
            self.y.offset(offset.y),
            self.z.offset(offset.z),
        )
    }

    /// Uniformly scale the box around `center`.
    pub fn scaled_around(&self, factor: f64, center: DVec3) -> Aabb {
        Aabb::from_points(
            (self.minimum() - center) * factor + center,
            (self.maximum() - center) * factor + center,
        )
    }
}

impl Convex for Aabb {
    /// Slab method, tracking which face the line enters and leaves through.
    fn span(&self, line: &Line) -> Option<Span> {
        let mut span = Span::UNBOUNDED;

        for axis in 0..3 {
            let slab = self.axis(axis);
            let origin = line.start[axis];
            let direction = line.direction[axis];

            if direction.abs() < f64::EPSILON {
                if !slab.contains(origin) {
                    return None;
                }
                continue;
            }

            let mut near = (slab.min - origin) / direction;
            let mut far = (slab.max - origin) / direction;
            let mut near_normal = DVec3::ZERO;
            near_normal[axis] = -1.0;
            let mut far_normal = DVec3::ZERO;
            far_normal[axis] = 1.0;

            if direction < 0.0 {
                std::mem::swap(&mut near, &mut far);
                std::mem::swap(&mut near_normal, &mut far_normal);
            }

            span = span.intersect(&Span::new(near, near_normal, far, far_normal))?;
        }

        Some(span)
    }

    fn contains(&self, point: DVec3) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y) && self.z.contains(point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConvexLineResult, Ray};

    #[test]
    fn test_aabb_from_points() {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(10.0, 10.0, 10.0);
        let aabb = Aabb::from_points(b, a);

        assert_eq!(aabb.minimum(), a);
        assert_eq!(aabb.maximum(), b);
    }

    #[test]
    fn test_union_and_padding() {
        let a = Aabb::from_points(DVec3::ZERO, DVec3::new(5.0, 5.0, 0.0));
        let b = Aabb::from_points(DVec3::splat(3.0), DVec3::splat(10.0));

        assert!(a.z.size() >= Aabb::MIN_THICKNESS);
        assert_eq!(a.union(&b).maximum(), DVec3::splat(10.0));
        assert_eq!(Aabb::EMPTY.union(&b), b);
    }

    #[test]
    fn test_aabb_ray_enter_exit_normals() {
        let aabb = Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0));
        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);

        match aabb.intersection(&Line::from_ray(&ray)) {
            ConvexLineResult::EnterExit(enter, exit) => {
                assert_eq!(enter.point, DVec3::new(0.0, 0.0, -1.0));
                assert_eq!(enter.normal, -DVec3::Z);
                assert_eq!(exit.point, DVec3::new(0.0, 0.0, 1.0));
                assert_eq!(exit.normal, DVec3::Z);
            }
            other => panic!("expected EnterExit, got {:?}", other),
        }
    }

    #[test]
    fn test_aabb_ray_from_inside_exits() {
        let aabb = Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0));
        let ray = Ray::new(DVec3::ZERO, -DVec3::X);

        match aabb.intersection(&Line::from_ray(&ray)) {
            ConvexLineResult::Exit(exit) => {
                assert_eq!(exit.point, DVec3::new(-1.0, 0.0, 0.0));
                assert_eq!(exit.normal, -DVec3::X);
            }
            other => panic!("expected Exit, got {:?}", other),
        }
    }

    #[test]
    fn test_aabb_miss_and_pointing_away() {
        let aabb = Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0));

        let away = Ray::new(DVec3::new(0.0, 0.0, -5.0), -DVec3::Z);
        assert!(!aabb.intersects_line(&Line::from_ray(&away)));

        let beside = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::Z);
        assert!(!aabb.intersects_line(&Line::from_ray(&beside)));
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = Aabb::from_points(DVec3::ZERO, DVec3::splat(2.0));
        let b = Aabb::from_points(DVec3::splat(1.0), DVec3::splat(3.0));
        let c = Aabb::from_points(DVec3::splat(5.0), DVec3::splat(6.0));

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_aabb_scaled_around_center() {
        let aabb = Aabb::from_points(DVec3::ZERO, DVec3::splat(2.0));
        let scaled = aabb.scaled_around(2.0, aabb.center());

        assert_eq!(scaled.minimum(), DVec3::splat(-1.0));
        assert_eq!(scaled.maximum(), DVec3::splat(3.0));
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(DVec3::ZERO, DVec3::ONE);
        let translated = aabb.translate(DVec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.x.min, 5.0);
        assert_eq!(translated.x.max, 6.0);
        assert_eq!(translated.y.min, 0.0);
    }

    #[test]
    fn test_point_cloud_bounds() {
        let bounds = Aabb::from_point_cloud([
            DVec3::new(1.0, -2.0, 0.0),
            DVec3::new(-1.0, 4.0, 3.0),
        ]);
        assert_eq!(bounds.minimum(), DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.maximum(), DVec3::new(1.0, 4.0, 3.0));
        assert!(Aabb::from_point_cloud([]).is_empty());
    }
}
