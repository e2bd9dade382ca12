//! Intersection results and the distance-sorted lists CSG works with.

use lumen_math::{DMat3, DVec3, PointNormal, RotationExt, SurfaceCrossing};

use crate::element::ElementId;
use crate::material::MaterialId;
use crate::ray_ignore::RayIgnore;

/// Which way a ray passed through the surface it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitDirection {
    /// From inside the volume out of it.
    Inside,
    /// From outside the volume into it.
    Outside,
    /// Through a surface with no volume, such as a plane.
    SinglePoint,
}

impl HitDirection {
    /// Swaps `Inside` and `Outside`; `SinglePoint` stays as is.
    pub fn inverted(self) -> Self {
        match self {
            HitDirection::Inside => HitDirection::Outside,
            HitDirection::Outside => HitDirection::Inside,
            HitDirection::SinglePoint => HitDirection::SinglePoint,
        }
    }
}

impl From<SurfaceCrossing> for HitDirection {
    fn from(crossing: SurfaceCrossing) -> Self {
        match crossing {
            SurfaceCrossing::Entering => HitDirection::Outside,
            SurfaceCrossing::Exiting => HitDirection::Inside,
            SurfaceCrossing::Flat => HitDirection::SinglePoint,
        }
    }
}

/// A single ray/surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Element that produced (or re-tagged) this hit
    pub id: ElementId,
    pub point_normal: PointNormal,
    pub direction: HitDirection,
    /// Squared distance from the ray start to the hit point
    pub distance_squared: f64,
    pub material: Option<MaterialId>,
}

impl RayHit {
    pub fn new(
        id: ElementId,
        point_normal: PointNormal,
        direction: HitDirection,
        ray_start: DVec3,
        material: Option<MaterialId>,
    ) -> Self {
        Self {
            id,
            point_normal,
            direction,
            distance_squared: point_normal.point.distance_squared(ray_start),
            material,
        }
    }

    #[inline]
    pub fn point(&self) -> DVec3 {
        self.point_normal.point
    }

    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.point_normal.normal
    }

    pub fn with_inverted_direction(mut self) -> Self {
        self.direction = self.direction.inverted();
        self
    }

    /// Rigid motions keep `distance_squared` valid for the moved ray.
    pub fn translated(mut self, offset: DVec3) -> Self {
        self.point_normal.point += offset;
        self
    }

    /// Uniform scale; the normal is unchanged and the distance scales with it.
    pub fn scaled(mut self, factor: f64, center: DVec3) -> Self {
        self.point_normal.point = (self.point_normal.point - center) * factor + center;
        self.distance_squared *= factor * factor;
        self
    }

    pub fn rotated(mut self, rotation: &DMat3, center: DVec3) -> Self {
        self.point_normal.point = rotation.rotate_around(self.point_normal.point, center);
        self.point_normal.normal = (*rotation * self.point_normal.normal).normalize_or_zero();
        self
    }

    /// Ignore rule that skips this hit in a follow-up cast starting at it.
    pub fn ray_ignore_for_hit(&self, minimum_ray_length_squared: f64) -> RayIgnore {
        match self.direction {
            HitDirection::Inside => RayIgnore::Entrance {
                id: self.id,
                minimum_ray_length_squared,
            },
            HitDirection::Outside => RayIgnore::Exit {
                id: self.id,
                minimum_ray_length_squared,
            },
            HitDirection::SinglePoint => RayIgnore::Full(self.id),
        }
    }
}

/// Hits kept in ascending `distance_squared` order.
///
/// Insertion is stable: a hit lands after every hit at the same distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedRayHits {
    hits: Vec<RayHit>,
}

impl SortedRayHits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hit: RayHit) {
        let index = self
            .hits
            .partition_point(|h| h.distance_squared <= hit.distance_squared);
        self.hits.insert(index, hit);
    }

    pub fn first(&self) -> Option<&RayHit> {
        self.hits.first()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RayHit> {
        self.hits.iter()
    }

    pub fn as_slice(&self) -> &[RayHit] {
        &self.hits
    }

    pub fn into_vec(self) -> Vec<RayHit> {
        self.hits
    }
}

impl From<Vec<RayHit>> for SortedRayHits {
    fn from(mut hits: Vec<RayHit>) -> Self {
        hits.sort_by(|a, b| a.distance_squared.total_cmp(&b.distance_squared));
        Self { hits }
    }
}

impl Extend<RayHit> for SortedRayHits {
    fn extend<I: IntoIterator<Item = RayHit>>(&mut self, iter: I) {
        for hit in iter {
            self.insert(hit);
        }
    }
}

impl IntoIterator for SortedRayHits {
    type Item = RayHit;
    type IntoIter = std::vec::IntoIter<RayHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a SortedRayHits {
    type Item = &'a RayHit;
    type IntoIter = std::slice::Iter<'a, RayHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

/// Which input list a zipped hit came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zipped {
    S0(RayHit),
    S1(RayHit),
}

impl Zipped {
    pub fn hit(&self) -> RayHit {
        match *self {
            Zipped::S0(hit) | Zipped::S1(hit) => hit,
        }
    }
}

/// Merges two sorted hit lists, preferring `s0` when distances tie.
pub struct HitZipper<'a> {
    s0: &'a [RayHit],
    s1: &'a [RayHit],
}

impl<'a> HitZipper<'a> {
    pub fn new(s0: &'a SortedRayHits, s1: &'a SortedRayHits) -> Self {
        Self {
            s0: s0.as_slice(),
            s1: s1.as_slice(),
        }
    }
}

impl Iterator for HitZipper<'_> {
    type Item = Zipped;

    fn next(&mut self) -> Option<Zipped> {
        let take_s0 = match (self.s0.first(), self.s1.first()) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a.distance_squared <= b.distance_squared,
        };

        if take_s0 {
            let (hit, rest) = self.s0.split_first()?;
            self.s0 = rest;
            Some(Zipped::S0(*hit))
        } else {
            let (hit, rest) = self.s1.split_first()?;
            self.s1 = rest;
            Some(Zipped::S1(*hit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hit_at(id: ElementId, distance: f64) -> RayHit {
        RayHit::new(
            id,
            PointNormal::new(DVec3::new(distance, 0.0, 0.0), -DVec3::X),
            HitDirection::Outside,
            DVec3::ZERO,
            None,
        )
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut hits = SortedRayHits::new();
        hits.insert(hit_at(0, 5.0));
        hits.insert(hit_at(1, 1.0));
        hits.insert(hit_at(2, 3.0));

        let ids: Vec<ElementId> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn test_insert_ties_are_stable() {
        let mut hits = SortedRayHits::new();
        hits.insert(hit_at(0, 2.0));
        hits.insert(hit_at(1, 2.0));
        hits.insert(hit_at(2, 2.0));

        let ids: Vec<ElementId> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_zipper_prefers_s0_on_ties() {
        let s0 = SortedRayHits::from(vec![hit_at(0, 1.0), hit_at(0, 4.0)]);
        let s1 = SortedRayHits::from(vec![hit_at(1, 1.0), hit_at(1, 2.0)]);

        let order: Vec<(bool, f64)> = HitZipper::new(&s0, &s1)
            .map(|z| (matches!(z, Zipped::S0(_)), z.hit().point().x))
            .collect();

        assert_eq!(
            order,
            vec![(true, 1.0), (false, 1.0), (false, 2.0), (true, 4.0)]
        );
    }

    #[test]
    fn test_ray_ignore_for_hit() {
        let mut hit = hit_at(7, 1.0);
        assert_eq!(
            hit.ray_ignore_for_hit(0.5),
            RayIgnore::Exit {
                id: 7,
                minimum_ray_length_squared: 0.5
            }
        );

        hit.direction = HitDirection::Inside;
        assert!(matches!(
            hit.ray_ignore_for_hit(0.0),
            RayIgnore::Entrance { id: 7, .. }
        ));

        hit.direction = HitDirection::SinglePoint;
        assert_eq!(hit.ray_ignore_for_hit(0.0), RayIgnore::Full(7));
    }

    #[test]
    fn test_scaled_hit_distance() {
        let hit = hit_at(0, 2.0).scaled(3.0, DVec3::ZERO);
        assert_eq!(hit.point(), DVec3::new(6.0, 0.0, 0.0));
        assert_eq!(hit.distance_squared, 36.0);
    }

    proptest! {
        #[test]
        fn prop_sorted_after_any_inserts(distances in proptest::collection::vec(0.0f64..1e6, 0..64)) {
            let mut hits = SortedRayHits::new();
            for (id, distance) in distances.iter().enumerate() {
                hits.insert(hit_at(id, *distance));
            }

            prop_assert_eq!(hits.len(), distances.len());
            for pair in hits.as_slice().windows(2) {
                prop_assert!(pair[0].distance_squared <= pair[1].distance_squared);
            }
        }
    }
}
