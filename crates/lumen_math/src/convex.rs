//! Line/volume intersection results shared by every shape.

use crate::{DVec3, Interval, LineSegment, Ray};

/// A surface point together with its normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointNormal {
    pub point: DVec3,
    pub normal: DVec3,
}

impl PointNormal {
    pub fn new(point: DVec3, normal: DVec3) -> Self {
        Self { point, normal }
    }
}

/// A parametric line `start + direction * t` restricted to `range`.
///
/// Built from either a [`Ray`] (`t` in `[0, inf]`) or a [`LineSegment`]
/// (`t` in `[0, length]`). `direction` is always unit length or zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: DVec3,
    pub direction: DVec3,
    pub range: Interval,
}

impl Line {
    pub fn from_ray(ray: &Ray) -> Self {
        Self {
            start: ray.start,
            direction: ray.direction,
            range: Interval::RAY,
        }
    }

    pub fn from_segment(segment: &LineSegment) -> Self {
        Self {
            start: segment.start,
            direction: segment.direction(),
            range: Interval::new(0.0, segment.length()),
        }
    }

    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.start + self.direction * t
    }

    /// End point for finite lines.
    pub fn end(&self) -> Option<DVec3> {
        self.range.max.is_finite().then(|| self.at(self.range.max))
    }

    /// Zero-length direction; such lines intersect nothing.
    pub fn is_degenerate(&self) -> bool {
        self.direction == DVec3::ZERO
    }
}

/// Result of intersecting a line with a convex volume or a flat surface.
///
/// Normals of `Enter` and `Exit` points point away from the volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvexLineResult {
    NoIntersection,
    /// The whole line lies inside the volume.
    Contained,
    /// The line ends inside the volume.
    Enter(PointNormal),
    /// The line starts inside the volume.
    Exit(PointNormal),
    EnterExit(PointNormal, PointNormal),
    /// Intersection with a surface that has no volume, such as a plane.
    SinglePoint(PointNormal),
}

impl ConvexLineResult {
    /// Entrance point; flat surfaces count as an entrance.
    pub fn entrance(&self) -> Option<PointNormal> {
        match *self {
            Self::Enter(p) | Self::SinglePoint(p) | Self::EnterExit(p, _) => Some(p),
            _ => None,
        }
    }

    /// Exit point; flat surfaces count as an exit.
    pub fn exit(&self) -> Option<PointNormal> {
        match *self {
            Self::Exit(p) | Self::SinglePoint(p) | Self::EnterExit(_, p) => Some(p),
            _ => None,
        }
    }

    /// Every point of this result as crossings, nearest first.
    pub fn crossings(&self) -> Vec<LineCrossing> {
        match *self {
            Self::NoIntersection | Self::Contained => Vec::new(),
            Self::Enter(p) => vec![LineCrossing::new(p, SurfaceCrossing::Entering)],
            Self::Exit(p) => vec![LineCrossing::new(p, SurfaceCrossing::Exiting)],
            Self::EnterExit(enter, exit) => vec![
                LineCrossing::new(enter, SurfaceCrossing::Entering),
                LineCrossing::new(exit, SurfaceCrossing::Exiting),
            ],
            Self::SinglePoint(p) => vec![LineCrossing::new(p, SurfaceCrossing::Flat)],
        }
    }
}

/// How a line passes through a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCrossing {
    /// From outside the volume to inside.
    Entering,
    /// From inside the volume to outside.
    Exiting,
    /// Through a surface without volume.
    Flat,
}

/// A single point where a line crosses a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCrossing {
    pub point_normal: PointNormal,
    pub crossing: SurfaceCrossing,
}

impl LineCrossing {
    pub fn new(point_normal: PointNormal, crossing: SurfaceCrossing) -> Self {
        Self {
            point_normal,
            crossing,
        }
    }
}

/// Parameters where an infinite line enters and leaves a convex volume.
///
/// `None` on either side means the line stays inside the volume forever in
/// that direction (half-spaces, or lines parallel to a slab).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub enter: Option<(f64, DVec3)>,
    pub exit: Option<(f64, DVec3)>,
}

impl Span {
    pub const UNBOUNDED: Span = Span {
        enter: None,
        exit: None,
    };

    pub fn new(t_enter: f64, enter_normal: DVec3, t_exit: f64, exit_normal: DVec3) -> Self {
        Self {
            enter: Some((t_enter, enter_normal)),
            exit: Some((t_exit, exit_normal)),
        }
    }

    fn t_enter(&self) -> f64 {
        self.enter.map_or(f64::NEG_INFINITY, |(t, _)| t)
    }

    fn t_exit(&self) -> f64 {
        self.exit.map_or(f64::INFINITY, |(t, _)| t)
    }

    /// Overlap of two spans, as produced by intersecting two convex volumes.
    pub fn intersect(&self, other: &Span) -> Option<Span> {
        let enter = if self.t_enter() >= other.t_enter() {
            self.enter
        } else {
            other.enter
        };
        let exit = if self.t_exit() <= other.t_exit() {
            self.exit
        } else {
            other.exit
        };
        let span = Span { enter, exit };

        (span.t_enter() <= span.t_exit()).then_some(span)
    }

    /// Classify this span against the parameter range of `line`.
    pub fn classify(&self, line: &Line) -> ConvexLineResult {
        let range = line.range;
        if self.t_exit() < range.min || self.t_enter() > range.max {
            return ConvexLineResult::NoIntersection;
        }

        let point = |(t, normal): (f64, DVec3)| PointNormal::new(line.at(t), normal);
        let enter = self
            .enter
            .filter(|(t, _)| *t >= range.min)
            .map(point);
        let exit = self.exit.filter(|(t, _)| *t <= range.max).map(point);

        match (enter, exit) {
            (Some(enter), Some(exit)) => ConvexLineResult::EnterExit(enter, exit),
            (Some(enter), None) => ConvexLineResult::Enter(enter),
            (None, Some(exit)) => ConvexLineResult::Exit(exit),
            (None, None) => ConvexLineResult::Contained,
        }
    }
}

/// A closed convex volume that can report where a line passes through it.
pub trait Convex {
    /// Span of the infinite line through this volume, if it intersects at all.
    fn span(&self, line: &Line) -> Option<Span>;

    /// Returns true if `point` lies inside or on the surface of the volume.
    fn contains(&self, point: DVec3) -> bool;

    /// Intersect this volume with a ray or line segment.
    fn intersection(&self, line: &Line) -> ConvexLineResult {
        if line.is_degenerate() {
            return ConvexLineResult::NoIntersection;
        }
        match self.span(line) {
            Some(span) => span.classify(line),
            None => ConvexLineResult::NoIntersection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_line(length: f64) -> Line {
        Line {
            start: DVec3::ZERO,
            direction: DVec3::X,
            range: Interval::new(0.0, length),
        }
    }

    #[test]
    fn test_classify_enter_exit() {
        let span = Span::new(2.0, -DVec3::X, 4.0, DVec3::X);
        match span.classify(&segment_line(10.0)) {
            ConvexLineResult::EnterExit(enter, exit) => {
                assert_eq!(enter.point, DVec3::new(2.0, 0.0, 0.0));
                assert_eq!(exit.point, DVec3::new(4.0, 0.0, 0.0));
            }
            other => panic!("expected EnterExit, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_partial_spans() {
        let span = Span::new(-2.0, -DVec3::X, 4.0, DVec3::X);
        assert!(matches!(span.classify(&segment_line(10.0)), ConvexLineResult::Exit(_)));
        assert!(matches!(span.classify(&segment_line(3.0)), ConvexLineResult::Contained));

        let span = Span::new(2.0, -DVec3::X, 4.0, DVec3::X);
        assert!(matches!(span.classify(&segment_line(3.0)), ConvexLineResult::Enter(_)));
        assert_eq!(span.classify(&segment_line(1.0)), ConvexLineResult::NoIntersection);
    }

    #[test]
    fn test_unbounded_span_on_ray() {
        let line = Line::from_ray(&Ray::new(DVec3::ZERO, DVec3::X));
        let span = Span {
            enter: Some((3.0, -DVec3::X)),
            exit: None,
        };
        assert!(matches!(span.classify(&line), ConvexLineResult::Enter(_)));
        assert_eq!(Span::UNBOUNDED.classify(&line), ConvexLineResult::Contained);
    }

    #[test]
    fn test_span_intersect_picks_inner_bounds() {
        let a = Span::new(0.0, -DVec3::X, 10.0, DVec3::X);
        let b = Span::new(3.0, -DVec3::Y, 12.0, DVec3::Y);
        let overlap = a.intersect(&b).unwrap();

        assert_eq!(overlap.enter, Some((3.0, -DVec3::Y)));
        assert_eq!(overlap.exit, Some((10.0, DVec3::X)));

        let c = Span::new(11.0, -DVec3::Z, 12.0, DVec3::Z);
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn test_crossings_order() {
        let enter = PointNormal::new(DVec3::ZERO, -DVec3::X);
        let exit = PointNormal::new(DVec3::X, DVec3::X);
        let crossings = ConvexLineResult::EnterExit(enter, exit).crossings();

        assert_eq!(crossings.len(), 2);
        assert_eq!(crossings[0].crossing, SurfaceCrossing::Entering);
        assert_eq!(crossings[1].crossing, SurfaceCrossing::Exiting);
        assert!(ConvexLineResult::Contained.crossings().is_empty());
    }
}
