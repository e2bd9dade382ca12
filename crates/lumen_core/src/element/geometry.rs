use lumen_math::{
    Aabb, Convex, ConvexLineResult, Cube, Cylinder, Disk, Ellipsoid, Hyperplane, Line,
    LineCrossing, LineSegment, Plane, Sphere, Torus,
};

/// Shape carried by a leaf element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Sphere(Sphere),
    Aabb(Aabb),
    Cube(Cube),
    Cylinder(Cylinder),
    Disk(Disk),
    Ellipsoid(Ellipsoid),
    Plane(Plane),
    Hyperplane(Hyperplane),
    Torus(Torus),
    /// Has no volume or area; only contributes bounds.
    LineSegment(LineSegment),
}

impl Geometry {
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Sphere(_) => "sphere",
            Geometry::Aabb(_) => "aabb",
            Geometry::Cube(_) => "cube",
            Geometry::Cylinder(_) => "cylinder",
            Geometry::Disk(_) => "disk",
            Geometry::Ellipsoid(_) => "ellipsoid",
            Geometry::Plane(_) => "plane",
            Geometry::Hyperplane(_) => "hyperplane",
            Geometry::Torus(_) => "torus",
            Geometry::LineSegment(_) => "line segment",
        }
    }

    fn convex_intersection(&self, line: &Line) -> Option<ConvexLineResult> {
        let result = match self {
            Geometry::Sphere(s) => s.intersection(line),
            Geometry::Aabb(b) => b.intersection(line),
            Geometry::Cube(c) => c.intersection(line),
            Geometry::Cylinder(c) => c.intersection(line),
            Geometry::Ellipsoid(e) => e.intersection(line),
            Geometry::Hyperplane(h) => h.intersection(line),
            Geometry::Disk(d) => d.intersection(line),
            Geometry::Plane(p) => p.intersection(line),
            Geometry::Torus(_) | Geometry::LineSegment(_) => return None,
        };
        Some(result)
    }

    /// Surface crossings along `line`, nearest first.
    pub fn crossings(&self, line: &Line) -> Vec<LineCrossing> {
        match self {
            Geometry::Torus(torus) => torus.crossings(line),
            Geometry::LineSegment(_) => Vec::new(),
            _ => self
                .convex_intersection(line)
                .map(|result| result.crossings())
                .unwrap_or_default(),
        }
    }

    /// Returns true if the whole line lies inside the solid.
    pub fn fully_contains(&self, line: &Line) -> bool {
        match self {
            Geometry::Torus(torus) => {
                let Some(end) = line.end() else {
                    return false;
                };
                torus.contains(line.start) && torus.contains(end) && torus.crossings(line).is_empty()
            }
            _ => matches!(
                self.convex_intersection(line),
                Some(ConvexLineResult::Contained)
            ),
        }
    }

    /// Bounds of the shape; `None` for infinite shapes.
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Geometry::Sphere(s) => Some(s.bounds()),
            Geometry::Aabb(b) => Some(*b),
            Geometry::Cube(c) => Some(c.bounds()),
            Geometry::Cylinder(c) => Some(c.bounds()),
            Geometry::Disk(d) => Some(d.bounds()),
            Geometry::Ellipsoid(e) => Some(e.bounds()),
            Geometry::Torus(t) => Some(t.bounds()),
            Geometry::LineSegment(l) => Some(l.bounds()),
            Geometry::Plane(_) | Geometry::Hyperplane(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::{DVec3, Ray};

    #[test]
    fn test_flat_shapes_never_contain() {
        let line = Line::from_segment(&LineSegment::new(DVec3::ZERO, DVec3::X));
        let plane = Geometry::Plane(Plane::new(DVec3::ZERO, DVec3::Z));
        assert!(!plane.fully_contains(&line));
        assert!(plane.bounds().is_none());
    }

    #[test]
    fn test_line_segment_is_never_hit() {
        let geometry = Geometry::LineSegment(LineSegment::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 10.0)));
        let line = Line::from_ray(&Ray::new(DVec3::new(-5.0, 0.0, 5.0), DVec3::X));
        assert!(geometry.crossings(&line).is_empty());
        assert!(geometry.bounds().is_some());
    }

    #[test]
    fn test_torus_segment_inside_tube() {
        let torus = Geometry::Torus(Torus::new(DVec3::ZERO, DVec3::Z, 5.0, 1.0));
        let inside = LineSegment::new(DVec3::new(4.8, 0.0, 0.0), DVec3::new(5.2, 0.0, 0.0));
        assert!(torus.fully_contains(&Line::from_segment(&inside)));

        let through = LineSegment::new(DVec3::new(4.8, 0.0, 0.0), DVec3::new(8.0, 0.0, 0.0));
        assert!(!torus.fully_contains(&Line::from_segment(&through)));
    }
}
