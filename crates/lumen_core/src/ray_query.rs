//! The value threaded through the element tree while casting a ray.

use lumen_math::{Aabb, DMat3, DVec3, Line, LineCrossing, LineSegment, Ray, RotationExt};

use crate::element::ElementId;
use crate::material::MaterialId;
use crate::ray_hit::{RayHit, SortedRayHits};
use crate::ray_ignore::RayIgnore;

/// A ray cast in progress, with the nearest hit found so far.
///
/// Once a hit is recorded, `line_segment` and `ray_aabb` tightly bound the
/// ray from its start up to that hit, so later siblings can cull cheaply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub ray: Ray,
    pub ray_aabb: Option<Aabb>,
    /// Squared distance to `last_hit`, infinite while nothing was hit
    pub ray_magnitude_squared: f64,
    /// Only meaningful once `ray_magnitude_squared` is finite
    pub line_segment: LineSegment,
    pub last_hit: Option<RayHit>,
    pub ignoring: RayIgnore,
}

impl RayQuery {
    pub fn new(ray: Ray, ignoring: RayIgnore) -> Self {
        Self {
            ray,
            ray_aabb: None,
            ray_magnitude_squared: f64::INFINITY,
            line_segment: LineSegment::new(ray.start, ray.start),
            last_hit: None,
            ignoring,
        }
    }

    /// Copy of this query without hit information.
    pub fn with_nil_hit(&self) -> Self {
        Self::new(self.ray, self.ignoring)
    }

    /// Copy of this query with the ignore rule replaced.
    pub fn with_ignoring(mut self, ignoring: RayIgnore) -> Self {
        self.ignoring = ignoring;
        self
    }

    /// Record `hit` as the nearest hit, shrinking the traveled segment to it.
    pub fn with_hit(&self, hit: RayHit) -> Self {
        let magnitude_squared = hit.point().distance_squared(self.ray.start);
        let line_segment = LineSegment::new(
            self.ray.start,
            self.ray.projected_magnitude(magnitude_squared.sqrt()),
        );

        Self {
            ray: self.ray,
            ray_aabb: Some(line_segment.bounds()),
            ray_magnitude_squared: magnitude_squared,
            line_segment,
            last_hit: Some(hit),
            ignoring: self.ignoring,
        }
    }

    /// The traveled segment once something was hit, the whole ray otherwise.
    pub fn line(&self) -> Line {
        if self.ray_magnitude_squared.is_finite() {
            Line::from_segment(&self.line_segment)
        } else {
            Line::from_ray(&self.ray)
        }
    }

    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            ray: self.ray.translated(offset),
            ray_aabb: self.ray_aabb.map(|aabb| aabb.translate(offset)),
            ray_magnitude_squared: self.ray_magnitude_squared,
            line_segment: self.line_segment.translated(offset),
            last_hit: self.last_hit.map(|hit| hit.translated(offset)),
            ignoring: self.ignoring,
        }
    }

    /// Uniform scale around `center`; squared magnitudes scale by `factor^2`.
    pub fn scaled(&self, factor: f64, center: DVec3) -> Self {
        Self {
            ray: self.ray.scaled_around(factor, center),
            ray_aabb: self.ray_aabb.map(|aabb| aabb.scaled_around(factor, center)),
            ray_magnitude_squared: self.ray_magnitude_squared * factor * factor,
            line_segment: self.line_segment.scaled_around(factor, center),
            last_hit: self.last_hit.map(|hit| hit.scaled(factor, center)),
            ignoring: self.ignoring,
        }
    }

    pub fn rotated(&self, rotation: &DMat3, center: DVec3) -> Self {
        Self {
            ray: self.ray.rotated_around(rotation, center),
            ray_aabb: self
                .ray_aabb
                .map(|aabb| rotation.transform_aabb(&aabb, center)),
            ray_magnitude_squared: self.ray_magnitude_squared,
            line_segment: self.line_segment.rotated_around(rotation, center),
            last_hit: self.last_hit.map(|hit| hit.rotated(rotation, center)),
            ignoring: self.ignoring,
        }
    }

    /// Drop crossings beyond the current nearest hit.
    fn within_magnitude(&self, crossings: Vec<LineCrossing>) -> Vec<LineCrossing> {
        if !self.ray_magnitude_squared.is_finite() {
            return crossings;
        }
        crossings
            .into_iter()
            .filter(|c| c.point_normal.point.distance_squared(self.ray.start) <= self.ray_magnitude_squared)
            .collect()
    }

    /// Nearest-hit step for a leaf: record the point of interest among
    /// `crossings` if it is closer than the current hit.
    pub fn intersecting(
        &self,
        id: ElementId,
        material: Option<MaterialId>,
        crossings: Vec<LineCrossing>,
    ) -> Self {
        if self.ignoring.should_ignore_fully(id) {
            return *self;
        }

        let crossings = self.within_magnitude(crossings);
        match self.ignoring.point_of_interest(id, &crossings, self.ray.start) {
            Some(crossing) => self.with_hit(RayHit::new(
                id,
                crossing.point_normal,
                crossing.crossing.into(),
                self.ray.start,
                material,
            )),
            None => *self,
        }
    }

    /// All-hits step for a leaf: insert every surviving crossing.
    pub fn intersect_all(
        &self,
        id: ElementId,
        material: Option<MaterialId>,
        crossings: Vec<LineCrossing>,
        results: &mut SortedRayHits,
    ) {
        if self.ignoring.should_ignore_fully(id) {
            return;
        }

        let crossings = self.within_magnitude(crossings);
        for crossing in self.ignoring.points_of_interest(id, &crossings, self.ray.start) {
            results.insert(RayHit::new(
                id,
                crossing.point_normal,
                crossing.crossing.into(),
                self.ray.start,
                material,
            ));
        }
    }
}
