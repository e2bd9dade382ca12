//! Solid and flat shapes that rays and line segments can be tested against.
//!
//! Convex volumes implement [`Convex`]; flat shapes (planes, disks) report a
//! single point with a normal facing the incoming line; the torus is marched.

use crate::convex::{
    Convex, ConvexLineResult, Line, LineCrossing, PointNormal, Span, SurfaceCrossing,
};
use crate::{Aabb, DVec3};

/// Parallel-line threshold for dot products against unit directions.
const PARALLEL_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.center - self.radius, self.center + self.radius)
    }
}

impl Convex for Sphere {
    fn span(&self, line: &Line) -> Option<Span> {
        let oc = line.start - self.center;
        let half_b = oc.dot(line.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let (near, far) = (-half_b - sqrtd, -half_b + sqrtd);
        let normal_at = |t: f64| (line.at(t) - self.center) / self.radius;

        Some(Span::new(near, normal_at(near), far, normal_at(far)))
    }

    fn contains(&self, point: DVec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Axis-aligned ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub center: DVec3,
    pub radii: DVec3,
}

impl Ellipsoid {
    pub fn new(center: DVec3, radii: DVec3) -> Self {
        Self { center, radii }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.center - self.radii, self.center + self.radii)
    }

    fn normal_at(&self, point: DVec3) -> DVec3 {
        ((point - self.center) / (self.radii * self.radii)).normalize_or_zero()
    }
}

impl Convex for Ellipsoid {
    /// Solved in the space where the ellipsoid is a unit sphere; line
    /// parameters are unchanged by the per-axis scale.
    fn span(&self, line: &Line) -> Option<Span> {
        let origin = (line.start - self.center) / self.radii;
        let direction = line.direction / self.radii;

        let a = direction.length_squared();
        if a < PARALLEL_EPSILON {
            return None;
        }
        let half_b = origin.dot(direction);
        let c = origin.length_squared() - 1.0;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-half_b - sqrtd) / a;
        let far = (-half_b + sqrtd) / a;

        Some(Span::new(
            near,
            self.normal_at(line.at(near)),
            far,
            self.normal_at(line.at(far)),
        ))
    }

    fn contains(&self, point: DVec3) -> bool {
        ((point - self.center) / self.radii).length_squared() <= 1.0
    }
}

/// Axis-aligned cube anchored at its minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub location: DVec3,
    pub side: f64,
}

impl Cube {
    pub fn new(location: DVec3, side: f64) -> Self {
        Self { location, side }
    }

    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_points(self.location, self.location + self.side)
    }

    pub fn bounds(&self) -> Aabb {
        self.to_aabb()
    }
}

impl Convex for Cube {
    fn span(&self, line: &Line) -> Option<Span> {
        self.to_aabb().span(line)
    }

    fn contains(&self, point: DVec3) -> bool {
        self.to_aabb().contains(point)
    }
}

/// Capped cylinder between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub start: DVec3,
    pub end: DVec3,
    pub radius: f64,
}

impl Cylinder {
    pub fn new(start: DVec3, end: DVec3, radius: f64) -> Self {
        Self { start, end, radius }
    }

    fn axis(&self) -> (DVec3, f64) {
        let axis = self.end - self.start;
        let height = axis.length();
        (axis.normalize_or_zero(), height)
    }

    /// Bounds of both cap disks.
    pub fn bounds(&self) -> Aabb {
        let (axis, _) = self.axis();
        let cap = Disk::new(self.start, axis, self.radius).bounds();
        cap.union(&cap.translate(self.end - self.start))
    }

    /// Span of the infinite tube around the axis.
    fn side_span(&self, line: &Line, axis: DVec3) -> Option<Span> {
        let oc = line.start - self.start;
        let direction = line.direction - axis * line.direction.dot(axis);
        let origin = oc - axis * oc.dot(axis);

        let a = direction.length_squared();
        let c = origin.length_squared() - self.radius * self.radius;
        if a < PARALLEL_EPSILON {
            return (c <= 0.0).then_some(Span::UNBOUNDED);
        }

        let half_b = origin.dot(direction);
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-half_b - sqrtd) / a;
        let far = (-half_b + sqrtd) / a;
        let normal_at = |t: f64| (origin + direction * t) / self.radius;

        Some(Span::new(near, normal_at(near), far, normal_at(far)))
    }

    /// Span of the slab between both caps.
    fn cap_span(&self, line: &Line, axis: DVec3, height: f64) -> Option<Span> {
        let origin = (line.start - self.start).dot(axis);
        let direction = line.direction.dot(axis);

        if direction.abs() < PARALLEL_EPSILON {
            return (0.0..=height).contains(&origin).then_some(Span::UNBOUNDED);
        }

        let mut near = (0.0 - origin) / direction;
        let mut far = (height - origin) / direction;
        let (mut near_normal, mut far_normal) = (-axis, axis);
        if direction < 0.0 {
            std::mem::swap(&mut near, &mut far);
            std::mem::swap(&mut near_normal, &mut far_normal);
        }

        Some(Span::new(near, near_normal, far, far_normal))
    }
}

impl Convex for Cylinder {
    fn span(&self, line: &Line) -> Option<Span> {
        let (axis, height) = self.axis();
        if height == 0.0 {
            return None;
        }

        let side = self.side_span(line, axis)?;
        let caps = self.cap_span(line, axis, height)?;
        side.intersect(&caps)
    }

    fn contains(&self, point: DVec3) -> bool {
        let (axis, height) = self.axis();
        let offset = point - self.start;
        let along = offset.dot(axis);
        if !(0.0..=height).contains(&along) {
            return false;
        }
        (offset - axis * along).length_squared() <= self.radius * self.radius
    }
}

/// Intersection of a line with an infinite flat surface.
///
/// The returned normal is flipped so it faces against the line.
fn flat_intersection(point: DVec3, normal: DVec3, line: &Line) -> Option<(f64, PointNormal)> {
    let denom = line.direction.dot(normal);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (point - line.start).dot(normal) / denom;
    if !line.range.contains(t) {
        return None;
    }

    let facing = if denom > 0.0 { -normal } else { normal };
    Some((t, PointNormal::new(line.at(t), facing)))
}

/// Infinite two-sided plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: DVec3,
    pub normal: DVec3,
}

impl Plane {
    pub fn new(point: DVec3, normal: DVec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    pub fn intersection(&self, line: &Line) -> ConvexLineResult {
        match flat_intersection(self.point, self.normal, line) {
            Some((_, hit)) => ConvexLineResult::SinglePoint(hit),
            None => ConvexLineResult::NoIntersection,
        }
    }
}

/// Flat two-sided disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    pub center: DVec3,
    pub normal: DVec3,
    pub radius: f64,
}

impl Disk {
    pub fn new(center: DVec3, normal: DVec3, radius: f64) -> Self {
        Self {
            center,
            normal: normal.normalize_or_zero(),
            radius,
        }
    }

    pub fn intersection(&self, line: &Line) -> ConvexLineResult {
        match flat_intersection(self.center, self.normal, line) {
            Some((_, hit)) if hit.point.distance_squared(self.center) <= self.radius * self.radius => {
                ConvexLineResult::SinglePoint(hit)
            }
            _ => ConvexLineResult::NoIntersection,
        }
    }

    /// Tight bounds: the disk extends `radius * sqrt(1 - n_i^2)` along each axis.
    pub fn bounds(&self) -> Aabb {
        let n = self.normal;
        let extent = DVec3::new(
            (1.0 - n.x * n.x).max(0.0).sqrt(),
            (1.0 - n.y * n.y).max(0.0).sqrt(),
            (1.0 - n.z * n.z).max(0.0).sqrt(),
        ) * self.radius;
        Aabb::from_points(self.center - extent, self.center + extent)
    }
}

/// Half-space of every point on the side opposite to `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperplane {
    pub point: DVec3,
    pub normal: DVec3,
}

impl Hyperplane {
    pub fn new(point: DVec3, normal: DVec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    fn signed_distance(&self, point: DVec3) -> f64 {
        (point - self.point).dot(self.normal)
    }
}

impl Convex for Hyperplane {
    fn span(&self, line: &Line) -> Option<Span> {
        let denom = line.direction.dot(self.normal);
        let distance = self.signed_distance(line.start);

        if denom.abs() < PARALLEL_EPSILON {
            return (distance <= 0.0).then_some(Span::UNBOUNDED);
        }

        let t = -distance / denom;
        if denom > 0.0 {
            Some(Span {
                enter: None,
                exit: Some((t, self.normal)),
            })
        } else {
            Some(Span {
                enter: Some((t, self.normal)),
                exit: None,
            })
        }
    }

    fn contains(&self, point: DVec3) -> bool {
        self.signed_distance(point) <= 0.0
    }
}

/// Ring torus around `axis`, `major` being the distance from the center to
/// the middle of the tube and `minor` the tube radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    pub center: DVec3,
    pub axis: DVec3,
    pub major: f64,
    pub minor: f64,
}

impl Torus {
    const MAX_MARCH_STEPS: usize = 1024;
    const BISECTION_STEPS: usize = 48;

    pub fn new(center: DVec3, axis: DVec3, major: f64, minor: f64) -> Self {
        Self {
            center,
            axis: axis.normalize_or_zero(),
            major,
            minor,
        }
    }

    pub fn bounds(&self) -> Aabb {
        let a = self.axis;
        let ring = |component: f64| self.major * (1.0 - component * component).max(0.0).sqrt();
        let extent = DVec3::new(ring(a.x), ring(a.y), ring(a.z)) + self.minor;
        Aabb::from_points(self.center - extent, self.center + extent)
    }

    /// Exact signed distance to the surface; negative inside the tube.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        let offset = point - self.center;
        let height = offset.dot(self.axis);
        let radial = (offset - self.axis * height).length();
        DVec3::new(radial - self.major, height, 0.0).length() - self.minor
    }

    /// Outward normal at a point near the surface.
    pub fn normal_at(&self, point: DVec3) -> DVec3 {
        let offset = point - self.center;
        let radial = offset - self.axis * offset.dot(self.axis);
        let ring_point = self.center + radial.normalize_or_zero() * self.major;
        (point - ring_point).normalize_or_zero()
    }

    pub fn contains(&self, point: DVec3) -> bool {
        self.signed_distance(point) <= 0.0
    }

    /// Every surface crossing along `line`, nearest first.
    ///
    /// Marches the signed distance inside the bounding box and refines each
    /// sign change by bisection.
    pub fn crossings(&self, line: &Line) -> Vec<LineCrossing> {
        let mut crossings = Vec::new();
        if line.is_degenerate() {
            return crossings;
        }

        let Some(span) = self.bounds().span(line) else {
            return crossings;
        };
        let t_min = span.enter.map_or(line.range.min, |(t, _)| t.max(line.range.min));
        let t_max = span.exit.map_or(line.range.max, |(t, _)| t.min(line.range.max));
        if t_min > t_max || !t_max.is_finite() {
            return crossings;
        }

        let min_step = (self.minor * 1e-3).max(1e-9);
        let mut t = t_min;
        let mut distance = self.signed_distance(line.at(t));

        for _ in 0..Self::MAX_MARCH_STEPS {
            if t >= t_max {
                break;
            }
            let next_t = (t + distance.abs().max(min_step)).min(t_max);
            let next_distance = self.signed_distance(line.at(next_t));

            let was_outside = distance >= 0.0;
            if was_outside != (next_distance >= 0.0) {
                let root = self.bisect(line, t, next_t, was_outside);
                let point = line.at(root);
                let crossing = if was_outside {
                    SurfaceCrossing::Entering
                } else {
                    SurfaceCrossing::Exiting
                };
                crossings.push(LineCrossing::new(
                    PointNormal::new(point, self.normal_at(point)),
                    crossing,
                ));
            }

            t = next_t;
            distance = next_distance;
        }

        crossings
    }

    fn bisect(&self, line: &Line, mut low: f64, mut high: f64, low_outside: bool) -> f64 {
        for _ in 0..Self::BISECTION_STEPS {
            let mid = (low + high) * 0.5;
            if (self.signed_distance(line.at(mid)) >= 0.0) == low_outside {
                low = mid;
            } else {
                high = mid;
            }
        }
        (low + high) * 0.5
    }
}

/// Sphere enclosing a bounding box, used for cheap culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn from_bounds(bounds: &Aabb) -> Self {
        Self {
            center: bounds.center(),
            radius: bounds.size().length() / 2.0,
        }
    }

    pub fn as_sphere(&self) -> Sphere {
        Sphere::new(self.center, self.radius)
    }

    pub fn bounds(&self) -> Aabb {
        self.as_sphere().bounds()
    }

    /// Returns true if a ray or segment passes through the sphere or starts in it.
    pub fn intersects_line(&self, line: &Line) -> bool {
        let sphere = self.as_sphere();
        if sphere.contains(line.start) {
            return true;
        }
        !matches!(sphere.intersection(line), ConvexLineResult::NoIntersection)
    }
}
