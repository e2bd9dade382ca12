//! Boolean combination of two elements' hit lists.
//!
//! Each combinator casts both operands with a fresh, unignored query, walks
//! the two sorted hit lists in lockstep and tracks whether the ray is inside
//! each operand. A hit survives when the other operand's inside state says it
//! lies on the surface of the combined solid.

use crate::material::MaterialId;
use crate::ray_hit::{HitDirection, HitZipper, RayHit, SortedRayHits, Zipped};
use crate::ray_ignore::RayIgnore;
use crate::ray_query::RayQuery;

use super::{Combination, Element, ElementId};

/// Nearest-hit cast for a combinator, through its all-hits cast.
pub(super) fn raycast_nearest(element: &Element, query: RayQuery) -> RayQuery {
    let mut hits = SortedRayHits::new();
    element.raycast_all(&query, &mut hits);

    match hits.first() {
        Some(first) if first.distance_squared < query.ray_magnitude_squared => query.with_hit(*first),
        _ => query,
    }
}

struct Operands {
    query: RayQuery,
    s0: SortedRayHits,
    s1: SortedRayHits,
    material: Option<MaterialId>,
}

impl Operands {
    fn gather(combination: &Combination, query: &RayQuery) -> Self {
        let query = query.with_nil_hit().with_ignoring(RayIgnore::None);

        let mut s0 = SortedRayHits::new();
        combination.t0.raycast_all(&query, &mut s0);
        let mut s1 = SortedRayHits::new();
        combination.t1.raycast_all(&query, &mut s1);

        let material = combination
            .material
            .or_else(|| s0.first().and_then(|hit| hit.material))
            .or_else(|| s1.first().and_then(|hit| hit.material));

        Self {
            query,
            s0,
            s1,
            material,
        }
    }

    /// Whether the ray starts inside an operand: its first hit is an exit,
    /// or it has no hits and contains the whole ray.
    fn starts_inside(&self, hits: &SortedRayHits, element: &Element) -> bool {
        match hits.first() {
            Some(hit) => hit.direction == HitDirection::Inside,
            None => element.fully_contains(&self.query),
        }
    }
}

fn entering(hit: &RayHit) -> bool {
    hit.direction == HitDirection::Outside
}

/// Re-tag `hit` as belonging to the combinator and insert it unless the
/// caller's ignore rule excludes it.
fn emit(
    id: ElementId,
    material: Option<MaterialId>,
    mut hit: RayHit,
    query: &RayQuery,
    results: &mut SortedRayHits,
) {
    hit.id = id;
    hit.material = material;
    if !query.ignoring.should_ignore(&hit) {
        results.insert(hit);
    }
}

pub(super) fn union_all(
    id: ElementId,
    combination: &Combination,
    query: &RayQuery,
    results: &mut SortedRayHits,
) {
    if query.ignoring.should_ignore_fully(id) {
        return;
    }

    let operands = Operands::gather(combination, query);
    let mut inside_t0 = operands.starts_inside(&operands.s0, &combination.t0);
    let mut inside_t1 = operands.starts_inside(&operands.s1, &combination.t1);

    for zipped in HitZipper::new(&operands.s0, &operands.s1) {
        match zipped {
            Zipped::S0(hit) => {
                inside_t0 = entering(&hit);
                if !inside_t1 {
                    emit(id, operands.material, hit, query, results);
                }
            }
            Zipped::S1(hit) => {
                inside_t1 = entering(&hit);
                if !inside_t0 {
                    emit(id, operands.material, hit, query, results);
                }
            }
        }
    }
}

pub(super) fn intersection_all(
    id: ElementId,
    combination: &Combination,
    query: &RayQuery,
    results: &mut SortedRayHits,
) {
    if query.ignoring.should_ignore_fully(id) {
        return;
    }

    let operands = Operands::gather(combination, query);
    if operands.s0.is_empty() && operands.s1.is_empty() {
        return;
    }
    // An operand with no hits only keeps the other's hits if it contains the ray.
    let mut inside_t0 = operands.starts_inside(&operands.s0, &combination.t0);
    let mut inside_t1 = operands.starts_inside(&operands.s1, &combination.t1);
    if (operands.s0.is_empty() && !inside_t0) || (operands.s1.is_empty() && !inside_t1) {
        return;
    }

    for zipped in HitZipper::new(&operands.s0, &operands.s1) {
        match zipped {
            Zipped::S0(hit) => {
                inside_t0 = entering(&hit);
                if inside_t1 {
                    emit(id, operands.material, hit, query, results);
                }
            }
            Zipped::S1(hit) => {
                inside_t1 = entering(&hit);
                if inside_t0 {
                    emit(id, operands.material, hit, query, results);
                }
            }
        }
    }
}

pub(super) fn subtraction_all(
    id: ElementId,
    combination: &Combination,
    query: &RayQuery,
    results: &mut SortedRayHits,
) {
    if query.ignoring.should_ignore_fully(id) {
        return;
    }

    let operands = Operands::gather(combination, query);
    let mut inside_t0 = operands.starts_inside(&operands.s0, &combination.t0);
    if operands.s0.is_empty() && !inside_t0 {
        return;
    }
    let mut inside_t1 = operands.starts_inside(&operands.s1, &combination.t1);

    for zipped in HitZipper::new(&operands.s0, &operands.s1) {
        match zipped {
            Zipped::S0(hit) => {
                inside_t0 = entering(&hit);
                if !inside_t1 {
                    emit(id, operands.material, hit, query, results);
                }
            }
            Zipped::S1(hit) => {
                inside_t1 = entering(&hit);
                if inside_t0 {
                    // The carved surface faces into t1.
                    let mut flipped = hit.with_inverted_direction();
                    flipped.point_normal.normal = -flipped.point_normal.normal;
                    emit(id, operands.material, flipped, query, results);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ray_hit::HitDirection;
    use crate::{Element, ElementIdFactory, RayIgnore, RayQuery, SortedRayHits};
    use lumen_math::{DVec3, Ray};

    fn spheres() -> (Element, Element) {
        (
            Element::sphere(DVec3::ZERO, 10.0, Some(1)),
            Element::sphere(DVec3::new(15.0, 0.0, 0.0), 10.0, Some(2)),
        )
    }

    fn with_ids(mut element: Element) -> Element {
        element.attribute_ids(&mut ElementIdFactory::new());
        element
    }

    fn all_hits(element: &Element, ignoring: RayIgnore) -> Vec<(f64, HitDirection)> {
        let query = RayQuery::new(Ray::new(DVec3::new(-20.0, 0.0, 0.0), DVec3::X), ignoring);
        let mut hits = SortedRayHits::new();
        element.raycast_all(&query, &mut hits);
        hits.iter()
            .map(|hit| ((hit.point().x * 1e6).round() / 1e6, hit.direction))
            .collect()
    }

    #[test]
    fn test_union() {
        let (a, b) = spheres();
        let union = with_ids(a.union(b));
        assert_eq!(
            all_hits(&union, RayIgnore::None),
            vec![(-10.0, HitDirection::Outside), (25.0, HitDirection::Inside)]
        );
    }

    #[test]
    fn test_intersection() {
        let (a, b) = spheres();
        let intersection = with_ids(a.intersection(b));
        assert_eq!(
            all_hits(&intersection, RayIgnore::None),
            vec![(5.0, HitDirection::Outside), (10.0, HitDirection::Inside)]
        );
    }

    #[test]
    fn test_subtraction_flips_carved_surface() {
        let (a, b) = spheres();
        let subtraction = with_ids(a.subtraction(b));
        assert_eq!(
            all_hits(&subtraction, RayIgnore::None),
            vec![(-10.0, HitDirection::Outside), (5.0, HitDirection::Inside)]
        );

        let query = RayQuery::new(Ray::new(DVec3::new(-20.0, 0.0, 0.0), DVec3::X), RayIgnore::None);
        let mut hits = SortedRayHits::new();
        subtraction.raycast_all(&query, &mut hits);
        // The remaining solid lies at x < 5, so its surface there faces +X.
        assert!((hits.as_slice()[1].normal() - DVec3::X).length() < 1e-9);
    }

    #[test]
    fn test_hits_are_tagged_with_combinator() {
        let (a, b) = spheres();
        let union = with_ids(a.union(b));
        let query = RayQuery::new(Ray::new(DVec3::new(-20.0, 0.0, 0.0), DVec3::X), RayIgnore::None);
        let hit = union.raycast(query).last_hit.unwrap();

        assert_eq!(hit.id, union.id);
        assert_eq!(hit.material, Some(1));

        let overridden = with_ids(spheres().0.union(spheres().1).with_material(7));
        let hit = overridden.raycast(query).last_hit.unwrap();
        assert_eq!(hit.material, Some(7));
    }

    #[test]
    fn test_ignore_rules_apply_to_combinator_id() {
        let (a, b) = spheres();
        let union = with_ids(a.union(b));

        assert!(all_hits(&union, RayIgnore::Full(union.id)).is_empty());
        // Ignoring a child id has no effect on re-tagged hits.
        assert_eq!(all_hits(&union, RayIgnore::Full(1)).len(), 2);
        assert_eq!(
            all_hits(&union, RayIgnore::entrance(union.id)),
            vec![(25.0, HitDirection::Inside)]
        );
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let a = Element::sphere(DVec3::ZERO, 1.0, None);
        let b = Element::sphere(DVec3::new(10.0, 0.0, 0.0), 1.0, None);
        assert!(all_hits(&with_ids(a.intersection(b)), RayIgnore::None).is_empty());
    }

    #[test]
    fn test_intersection_with_containing_half_space() {
        // Half-space x <= 100 contains everything the sphere covers along the ray.
        let sphere = Element::sphere(DVec3::ZERO, 10.0, None);
        let half = Element::hyperplane(DVec3::new(100.0, 0.0, 0.0), DVec3::X, None);
        let hits = all_hits(&with_ids(sphere.intersection(half)), RayIgnore::None);
        assert_eq!(
            hits,
            vec![(-10.0, HitDirection::Outside), (10.0, HitDirection::Inside)]
        );
    }

    #[test]
    fn test_nearest_hit_respects_existing_hit() {
        let (a, b) = spheres();
        let union = with_ids(a.union(b));
        let blocker = Element::sphere(DVec3::new(-15.0, 0.0, 0.0), 1.0, None);
        let scene = Element::tuple(vec![blocker, union]);

        let query = RayQuery::new(Ray::new(DVec3::new(-20.0, 0.0, 0.0), DVec3::X), RayIgnore::None);
        let hit = scene.raycast(query).last_hit.unwrap();
        assert!((hit.point().x + 16.0).abs() < 1e-9);
    }
}
