//! Scene element tree.
//!
//! Leaves carry a [`Geometry`] and a material; inner nodes combine their
//! children with CSG rules, remap rays through transforms, or cull whole
//! subtrees through bounding volumes. Every node receives a stable id from
//! [`ElementIdFactory`] when the scene is built; ids drive material lookup
//! and [`RayIgnore`](crate::RayIgnore) matching.

mod builder;
mod csg;
mod geometry;
mod visitor;

pub use geometry::Geometry;
pub use visitor::{describe, walk, ElementLabeler, ElementVisitor};

use lumen_math::{Aabb, BoundingSphere, Convex, ConvexLineResult, DMat3, DVec3, RotationExt};

use crate::material::MaterialId;
use crate::ray_hit::SortedRayHits;
use crate::ray_query::RayQuery;

/// Identifier assigned to every element of a scene.
pub type ElementId = usize;

/// Hands out ids in increasing order, starting at 0.
#[derive(Debug, Default)]
pub struct ElementIdFactory {
    next_id: ElementId,
}

impl ElementIdFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_id(&mut self) -> ElementId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> usize {
        self.next_id
    }
}

/// Two operands of a CSG combinator with an optional material override.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub material: Option<MaterialId>,
    pub t0: Box<Element>,
    pub t1: Box<Element>,
}

/// Homogeneous list of elements, each culled by its own bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedArray {
    pub elements: Vec<Element>,
    bounds: Vec<Option<Aabb>>,
}

impl BoundedArray {
    pub fn new(elements: Vec<Element>) -> Self {
        let bounds = elements.iter().map(Element::bounds).collect();
        Self { elements, bounds }
    }

    fn candidates<'a>(&'a self, query: &'a RayQuery) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .iter()
            .zip(&self.bounds)
            .filter(move |(_, bounds)| bounds_admit(bounds, query))
            .map(|(element, _)| element)
    }

    /// Nearest-hit cast; each child is culled against the shrinking query.
    fn raycast(&self, query: RayQuery) -> RayQuery {
        self.elements
            .iter()
            .zip(&self.bounds)
            .fold(query, |current, (element, bounds)| {
                if bounds_admit(bounds, &current) {
                    element.raycast(current)
                } else {
                    current
                }
            })
    }
}

fn bounds_admit(bounds: &Option<Aabb>, query: &RayQuery) -> bool {
    match bounds {
        Some(bounds) => aabb_intersects_query(bounds, query),
        None => true,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Empty,
    Geometry {
        geometry: Geometry,
        material: Option<MaterialId>,
    },
    /// Independent children with no boolean meaning.
    Tuple(Vec<Element>),
    Array(BoundedArray),
    Union(Combination),
    Intersection(Combination),
    /// `t0` minus `t1`.
    Subtraction(Combination),
    Translate {
        translation: DVec3,
        element: Box<Element>,
    },
    Scale {
        factor: f64,
        center: DVec3,
        element: Box<Element>,
    },
    Rotate {
        rotation: DMat3,
        center: DVec3,
        element: Box<Element>,
    },
    /// `count` copies of the element, copy `i` shifted by `translation * i`.
    RepeatTranslate {
        translation: DVec3,
        count: usize,
        element: Box<Element>,
    },
    BoundingBox {
        bounds: Aabb,
        element: Box<Element>,
    },
    BoundingSphere {
        sphere: BoundingSphere,
        element: Box<Element>,
    },
}

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
}

fn aabb_intersects_query(bounds: &Aabb, query: &RayQuery) -> bool {
    if let Some(ray_aabb) = &query.ray_aabb {
        if !bounds.overlaps(ray_aabb) {
            return false;
        }
    }
    bounds.intersects_line(&query.line())
}

fn sphere_intersects_query(sphere: &BoundingSphere, query: &RayQuery) -> bool {
    if let Some(ray_aabb) = &query.ray_aabb {
        if !sphere.bounds().overlaps(ray_aabb) {
            return false;
        }
    }
    sphere.intersects_line(&query.line())
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self { id: 0, kind }
    }

    /// Direct children, in tree order.
    pub fn children(&self) -> Vec<&Element> {
        match &self.kind {
            ElementKind::Empty | ElementKind::Geometry { .. } => Vec::new(),
            ElementKind::Tuple(elements) => elements.iter().collect(),
            ElementKind::Array(array) => array.elements.iter().collect(),
            ElementKind::Union(c) | ElementKind::Intersection(c) | ElementKind::Subtraction(c) => {
                vec![&*c.t0, &*c.t1]
            }
            ElementKind::Translate { element, .. }
            | ElementKind::Scale { element, .. }
            | ElementKind::Rotate { element, .. }
            | ElementKind::RepeatTranslate { element, .. }
            | ElementKind::BoundingBox { element, .. }
            | ElementKind::BoundingSphere { element, .. } => vec![&**element],
        }
    }

    fn children_mut(&mut self) -> Vec<&mut Element> {
        match &mut self.kind {
            ElementKind::Empty | ElementKind::Geometry { .. } => Vec::new(),
            ElementKind::Tuple(elements) => elements.iter_mut().collect(),
            ElementKind::Array(array) => array.elements.iter_mut().collect(),
            ElementKind::Union(c) | ElementKind::Intersection(c) | ElementKind::Subtraction(c) => {
                vec![&mut *c.t0, &mut *c.t1]
            }
            ElementKind::Translate { element, .. }
            | ElementKind::Scale { element, .. }
            | ElementKind::Rotate { element, .. }
            | ElementKind::RepeatTranslate { element, .. }
            | ElementKind::BoundingBox { element, .. }
            | ElementKind::BoundingSphere { element, .. } => vec![&mut **element],
        }
    }

    /// Assign ids to this element and its subtree, pre-order.
    pub fn attribute_ids(&mut self, factory: &mut ElementIdFactory) {
        self.id = factory.make_id();
        for child in self.children_mut() {
            child.attribute_ids(factory);
        }
    }

    /// Number of elements in this subtree, itself included.
    pub fn element_count(&self) -> usize {
        let mut count = 0;
        walk(self, &mut |_, _| count += 1);
        count
    }

    /// Find the element with a given id in this subtree, pre-order.
    pub fn query(&self, id: ElementId) -> Option<&Element> {
        if self.id == id {
            return Some(self);
        }
        self.children().into_iter().find_map(|child| child.query(id))
    }

    /// Nearest-hit cast against the subtree with id `id` alone, placed in
    /// world space by the transforms above it. `None` when no element has
    /// that id.
    ///
    /// Copies of a repeated subtree share ids, so a target inside one casts
    /// against every copy.
    pub fn raycast_within(&self, id: ElementId, query: RayQuery) -> Option<RayQuery> {
        if self.id == id {
            return Some(self.raycast(query));
        }

        match &self.kind {
            ElementKind::Translate {
                translation,
                element,
            } => {
                let local = query.translated(-*translation);
                let result = element.raycast_within(id, local)?;
                Some(if result == local {
                    query
                } else {
                    result.translated(*translation)
                })
            }
            ElementKind::Scale {
                factor,
                center,
                element,
            } => {
                let local = query.scaled(1.0 / factor, *center);
                let result = element.raycast_within(id, local)?;
                Some(if result == local {
                    query
                } else {
                    result.scaled(*factor, *center)
                })
            }
            ElementKind::Rotate {
                rotation,
                center,
                element,
            } => {
                let local = query.rotated(&rotation.transpose(), *center);
                let result = element.raycast_within(id, local)?;
                Some(if result == local {
                    query
                } else {
                    result.rotated(rotation, *center)
                })
            }
            ElementKind::RepeatTranslate { element, .. } => {
                element.query(id).map(|_| self.raycast(query))
            }
            _ => self
                .children()
                .into_iter()
                .find_map(|child| child.raycast_within(id, query)),
        }
    }

    /// Nearest-hit cast: returns `query` with a closer hit recorded, or
    /// unchanged when this subtree has nothing closer.
    pub fn raycast(&self, query: RayQuery) -> RayQuery {
        match &self.kind {
            ElementKind::Empty => query,

            ElementKind::Geometry { geometry, material } => {
                if query.ignoring.should_ignore_fully(self.id) {
                    return query;
                }
                query.intersecting(self.id, *material, geometry.crossings(&query.line()))
            }

            ElementKind::Tuple(elements) => elements
                .iter()
                .fold(query, |query, element| element.raycast(query)),

            ElementKind::Array(array) => array.raycast(query),

            ElementKind::Union(_) | ElementKind::Intersection(_) | ElementKind::Subtraction(_) => {
                csg::raycast_nearest(self, query)
            }

            ElementKind::Translate {
                translation,
                element,
            } => {
                let local = query.translated(-*translation);
                let result = element.raycast(local);
                if result == local {
                    return query;
                }
                result.translated(*translation)
            }

            ElementKind::Scale {
                factor,
                center,
                element,
            } => {
                let local = query.scaled(1.0 / factor, *center);
                let result = element.raycast(local);
                if result == local {
                    return query;
                }
                result.scaled(*factor, *center)
            }

            ElementKind::Rotate {
                rotation,
                center,
                element,
            } => {
                let local = query.rotated(&rotation.transpose(), *center);
                let result = element.raycast(local);
                if result == local {
                    return query;
                }
                result.rotated(rotation, *center)
            }

            ElementKind::RepeatTranslate {
                translation,
                count,
                element,
            } => {
                let mut current = query;
                for _ in 0..*count {
                    current = element.raycast(current);
                    current = current.translated(-*translation);
                }
                current.translated(*translation * *count as f64)
            }

            ElementKind::BoundingBox { bounds, element } => {
                if !aabb_intersects_query(bounds, &query) {
                    return query;
                }
                element.raycast(query)
            }

            ElementKind::BoundingSphere { sphere, element } => {
                if !sphere_intersects_query(sphere, &query) {
                    return query;
                }
                element.raycast(query)
            }
        }
    }

    /// All-hits cast: inserts every surface crossing of this subtree into
    /// `results`, in world space.
    pub fn raycast_all(&self, query: &RayQuery, results: &mut SortedRayHits) {
        match &self.kind {
            ElementKind::Empty => {}

            ElementKind::Geometry { geometry, material } => {
                if query.ignoring.should_ignore_fully(self.id) {
                    return;
                }
                query.intersect_all(self.id, *material, geometry.crossings(&query.line()), results);
            }

            ElementKind::Tuple(elements) => {
                for element in elements {
                    element.raycast_all(query, results);
                }
            }

            ElementKind::Array(array) => {
                for element in array.candidates(query) {
                    element.raycast_all(query, results);
                }
            }

            ElementKind::Union(combination) => csg::union_all(self.id, combination, query, results),
            ElementKind::Intersection(combination) => {
                csg::intersection_all(self.id, combination, query, results)
            }
            ElementKind::Subtraction(combination) => {
                csg::subtraction_all(self.id, combination, query, results)
            }

            ElementKind::Translate {
                translation,
                element,
            } => {
                let mut local = SortedRayHits::new();
                element.raycast_all(&query.translated(-*translation), &mut local);
                results.extend(local.into_iter().map(|hit| hit.translated(*translation)));
            }

            ElementKind::Scale {
                factor,
                center,
                element,
            } => {
                let mut local = SortedRayHits::new();
                element.raycast_all(&query.scaled(1.0 / factor, *center), &mut local);
                results.extend(local.into_iter().map(|hit| hit.scaled(*factor, *center)));
            }

            ElementKind::Rotate {
                rotation,
                center,
                element,
            } => {
                let mut local = SortedRayHits::new();
                element.raycast_all(&query.rotated(&rotation.transpose(), *center), &mut local);
                results.extend(local.into_iter().map(|hit| hit.rotated(rotation, *center)));
            }

            ElementKind::RepeatTranslate {
                translation,
                count,
                element,
            } => {
                for index in 0..*count {
                    let offset = *translation * index as f64;
                    let mut local = SortedRayHits::new();
                    element.raycast_all(&query.translated(-offset), &mut local);
                    results.extend(local.into_iter().map(|hit| hit.translated(offset)));
                }
            }

            ElementKind::BoundingBox { bounds, element } => {
                if aabb_intersects_query(bounds, query) {
                    element.raycast_all(query, results);
                }
            }

            ElementKind::BoundingSphere { sphere, element } => {
                if sphere_intersects_query(sphere, query) {
                    element.raycast_all(query, results);
                }
            }
        }
    }

    /// Returns true if the query's ray (or traveled segment) lies entirely
    /// inside this element's volume.
    pub fn fully_contains(&self, query: &RayQuery) -> bool {
        match &self.kind {
            ElementKind::Empty => false,
            ElementKind::Geometry { geometry, .. } => geometry.fully_contains(&query.line()),
            ElementKind::Tuple(elements) => elements.iter().any(|e| e.fully_contains(query)),
            ElementKind::Array(array) => array.elements.iter().any(|e| e.fully_contains(query)),
            ElementKind::Union(c) => c.t0.fully_contains(query) || c.t1.fully_contains(query),
            ElementKind::Intersection(c) => {
                c.t0.fully_contains(query) && c.t1.fully_contains(query)
            }
            // The removed part must neither cross nor swallow the ray.
            ElementKind::Subtraction(c) => {
                c.t0.fully_contains(query)
                    && !c.t1.fully_contains(query)
                    && c.t1.raycast(*query) == *query
            }
            ElementKind::Translate {
                translation,
                element,
            } => element.fully_contains(&query.translated(-*translation)),
            ElementKind::Scale {
                factor,
                center,
                element,
            } => element.fully_contains(&query.scaled(1.0 / factor, *center)),
            ElementKind::Rotate {
                rotation,
                center,
                element,
            } => element.fully_contains(&query.rotated(&rotation.transpose(), *center)),
            ElementKind::RepeatTranslate {
                translation,
                count,
                element,
            } => (0..*count).any(|index| {
                element.fully_contains(&query.translated(-*translation * index as f64))
            }),
            ElementKind::BoundingBox { bounds, element } => {
                aabb_intersects_query(bounds, query)
                    && bounds.intersection(&query.line()) == ConvexLineResult::Contained
                    && element.fully_contains(query)
            }
            ElementKind::BoundingSphere { sphere, element } => {
                sphere_intersects_query(sphere, query)
                    && sphere.as_sphere().intersection(&query.line()) == ConvexLineResult::Contained
                    && element.fully_contains(query)
            }
        }
    }

    /// Bounds of this subtree; `None` when any part of it is unbounded.
    pub fn bounds(&self) -> Option<Aabb> {
        fn surrounding<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Aabb> {
            let mut iter = elements.into_iter();
            let first = iter.next()?.bounds()?;
            iter.try_fold(first, |acc, e| Some(acc.union(&e.bounds()?)))
        }

        match &self.kind {
            ElementKind::Empty => None,
            ElementKind::Geometry { geometry, .. } => geometry.bounds(),
            ElementKind::Tuple(elements) => surrounding(elements),
            ElementKind::Array(array) => surrounding(&array.elements),
            ElementKind::Union(c) => surrounding([&*c.t0, &*c.t1]),
            ElementKind::Intersection(c) => match (c.t0.bounds(), c.t1.bounds()) {
                (Some(a), Some(b)) => {
                    let overlap = Aabb::new(
                        a.x.intersect(&b.x),
                        a.y.intersect(&b.y),
                        a.z.intersect(&b.z),
                    );
                    Some(if overlap.is_empty() { Aabb::EMPTY } else { overlap })
                }
                (Some(a), None) | (None, Some(a)) => Some(a),
                (None, None) => None,
            },
            ElementKind::Subtraction(c) => c.t0.bounds(),
            ElementKind::Translate {
                translation,
                element,
            } => element.bounds().map(|b| b.translate(*translation)),
            ElementKind::Scale {
                factor,
                center,
                element,
            } => element.bounds().map(|b| b.scaled_around(*factor, *center)),
            ElementKind::Rotate {
                rotation,
                center,
                element,
            } => element
                .bounds()
                .map(|b| rotation.transform_aabb(&b, *center)),
            ElementKind::RepeatTranslate {
                translation,
                count,
                element,
            } => {
                let bounds = element.bounds()?;
                if *count == 0 {
                    return Some(Aabb::EMPTY);
                }
                let last = bounds.translate(*translation * (*count - 1) as f64);
                Some(bounds.union(&last))
            }
            ElementKind::BoundingBox { bounds, .. } => Some(*bounds),
            ElementKind::BoundingSphere { sphere, .. } => Some(sphere.bounds()),
        }
    }

    /// Dispatch to the visitor method matching this element's kind.
    pub fn accept<V: ElementVisitor>(&self, visitor: &mut V) -> V::Output {
        match &self.kind {
            ElementKind::Empty => visitor.visit_empty(self),
            ElementKind::Geometry { geometry, material } => {
                visitor.visit_geometry(self, geometry, *material)
            }
            ElementKind::Tuple(elements) => visitor.visit_tuple(self, elements),
            ElementKind::Array(array) => visitor.visit_array(self, array),
            ElementKind::Union(c) => visitor.visit_union(self, c),
            ElementKind::Intersection(c) => visitor.visit_intersection(self, c),
            ElementKind::Subtraction(c) => visitor.visit_subtraction(self, c),
            ElementKind::Translate {
                translation,
                element,
            } => visitor.visit_translate(self, *translation, element),
            ElementKind::Scale {
                factor,
                center,
                element,
            } => visitor.visit_scale(self, *factor, *center, element),
            ElementKind::Rotate {
                rotation,
                center,
                element,
            } => visitor.visit_rotate(self, rotation, *center, element),
            ElementKind::RepeatTranslate {
                translation,
                count,
                element,
            } => visitor.visit_repeat_translate(self, *translation, *count, element),
            ElementKind::BoundingBox { bounds, element } => {
                visitor.visit_bounding_box(self, bounds, element)
            }
            ElementKind::BoundingSphere { sphere, element } => {
                visitor.visit_bounding_sphere(self, sphere, element)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray_hit::HitDirection;
    use crate::RayIgnore;
    use lumen_math::Ray;

    fn ray_from(x: f64) -> RayQuery {
        RayQuery::new(Ray::new(DVec3::new(x, 0.0, 0.0), DVec3::X), RayIgnore::None)
    }

    #[test]
    fn test_ids_are_preorder() {
        let mut root = Element::sphere(DVec3::ZERO, 1.0, None)
            .union(Element::sphere(DVec3::X, 1.0, None))
            .translated(DVec3::Y);
        let mut factory = ElementIdFactory::new();
        root.attribute_ids(&mut factory);

        assert_eq!(factory.issued(), 4);
        assert_eq!(root.id, 0);
        let union = root.children()[0];
        assert_eq!(union.id, 1);
        assert_eq!(union.children()[0].id, 2);
        assert_eq!(union.children()[1].id, 3);
        assert_eq!(root.query(3).map(|e| e.id), Some(3));
        assert!(root.query(4).is_none());
    }

    #[test]
    fn test_tuple_returns_nearest_regardless_of_order() {
        let near = Element::sphere(DVec3::ZERO, 1.0, Some(0));
        let far = Element::sphere(DVec3::new(10.0, 0.0, 0.0), 1.0, Some(1));

        let a = Element::tuple(vec![near.clone(), far.clone()]);
        let b = Element::tuple(vec![far, near]);

        let hit_a = a.raycast(ray_from(-20.0)).last_hit.unwrap();
        let hit_b = b.raycast(ray_from(-20.0)).last_hit.unwrap();
        assert_eq!(hit_a.point(), hit_b.point());
        assert_eq!(hit_a.material, Some(0));
    }

    #[test]
    fn test_translate_maps_hit_back() {
        let element = Element::sphere(DVec3::ZERO, 1.0, None).translated(DVec3::new(10.0, 0.0, 0.0));
        let hit = element.raycast(ray_from(0.0)).last_hit.unwrap();

        assert!((hit.point() - DVec3::new(9.0, 0.0, 0.0)).length() < 1e-9);
        assert!((hit.distance_squared - 81.0).abs() < 1e-9);

        let mut all = SortedRayHits::new();
        element.raycast_all(&ray_from(0.0), &mut all);
        assert_eq!(all.len(), 2);
        assert!((all.as_slice()[1].point().x - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_maps_distances_back() {
        let element = Element::sphere(DVec3::ZERO, 1.0, None).scaled(3.0, DVec3::ZERO);
        let hit = element.raycast(ray_from(-10.0)).last_hit.unwrap();

        assert!((hit.point().x + 3.0).abs() < 1e-9);
        assert!((hit.distance_squared - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_maps_normals_back() {
        // Unit cube from the origin, rotated 90 degrees around Z: it now spans x in [-1, 0].
        let element = Element::cube(DVec3::ZERO, 1.0, None)
            .rotated(DMat3::from_rotation_z(std::f64::consts::FRAC_PI_2), DVec3::ZERO);
        let hit = element.raycast(RayQuery::new(
            Ray::new(DVec3::new(-10.0, 0.5, 0.5), DVec3::X),
            RayIgnore::None,
        ));
        let hit = hit.last_hit.unwrap();

        assert!((hit.point().x + 1.0).abs() < 1e-9);
        assert!((hit.normal() + DVec3::X).length() < 1e-9);
    }

    #[test]
    fn test_repeat_translate_hits_nearest_copy() {
        let element = Element::sphere(DVec3::ZERO, 1.0, None).repeated(DVec3::new(10.0, 0.0, 0.0), 3);

        let hit = element.raycast(ray_from(15.0)).last_hit.unwrap();
        assert!((hit.point().x - 19.0).abs() < 1e-9);

        let mut all = SortedRayHits::new();
        element.raycast_all(&ray_from(-5.0), &mut all);
        assert_eq!(all.len(), 6);

        let bounds = element.bounds().unwrap();
        assert!((bounds.x.max - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_culls_without_changing_results() {
        let inner = Element::sphere(DVec3::new(10.0, 0.0, 0.0), 1.0, None);
        let bounded = inner.clone().bounding_box();

        for start_y in [0.0, 0.5, 3.0] {
            let query = RayQuery::new(
                Ray::new(DVec3::new(0.0, start_y, 0.0), DVec3::X),
                RayIgnore::None,
            );
            assert_eq!(
                inner.raycast(query).last_hit,
                bounded.raycast(query).last_hit
            );
        }
    }

    #[test]
    fn test_bounding_sphere_culls_behind_closer_hit() {
        let far = Element::sphere(DVec3::new(50.0, 0.0, 0.0), 1.0, None).bounding_sphere();
        let near = Element::sphere(DVec3::new(5.0, 0.0, 0.0), 1.0, None);
        let scene = Element::tuple(vec![near, far]);

        let hit = scene.raycast(ray_from(0.0)).last_hit.unwrap();
        assert!((hit.point().x - 4.0).abs() < 1e-9);
        assert_eq!(hit.direction, HitDirection::Outside);
    }

    #[test]
    fn test_array_matches_tuple() {
        let children: Vec<Element> = (0..5)
            .map(|i| Element::sphere(DVec3::new(i as f64 * 5.0, 0.0, 0.0), 1.0, Some(i)))
            .collect();
        let array = Element::array(children.clone());
        let tuple = Element::tuple(children);

        let query = ray_from(12.0);
        assert_eq!(array.raycast(query).last_hit, tuple.raycast(query).last_hit);

        let (mut a, mut t) = (SortedRayHits::new(), SortedRayHits::new());
        array.raycast_all(&query, &mut a);
        tuple.raycast_all(&query, &mut t);
        assert_eq!(a, t);
    }

    #[test]
    fn test_unbounded_elements() {
        let plane = Element::plane(DVec3::ZERO, DVec3::Z, None);
        assert!(plane.bounds().is_none());
        assert!(Element::tuple(vec![plane, Element::sphere(DVec3::ZERO, 1.0, None)])
            .bounds()
            .is_none());
        assert!(Element::empty().bounds().is_none());
    }

    #[test]
    fn test_fully_contains() {
        let big = Element::sphere(DVec3::ZERO, 100.0, None);
        let query = ray_from(0.0).with_hit(crate::RayHit::new(
            9,
            lumen_math::PointNormal::new(DVec3::new(5.0, 0.0, 0.0), DVec3::X),
            HitDirection::Outside,
            DVec3::ZERO,
            None,
        ));
        assert!(big.fully_contains(&query));
        assert!(!big.fully_contains(&ray_from(0.0)));
        assert!(!Element::empty().fully_contains(&query));
    }

    #[test]
    fn test_fully_contains_through_combinators() {
        let query = ray_from(0.0);
        let below = || Element::hyperplane(DVec3::new(0.0, 0.0, 100.0), DVec3::Z, None);
        let above = || Element::hyperplane(DVec3::new(0.0, 0.0, -100.0), -DVec3::Z, None);
        let far = || Element::sphere(DVec3::new(0.0, 500.0, 0.0), 1.0, None);
        let away = || Element::hyperplane(DVec3::new(0.0, 0.0, -100.0), DVec3::Z, None);

        assert!(below().fully_contains(&query));
        assert!(!away().fully_contains(&query));

        assert!(below().union(far()).fully_contains(&query));
        assert!(far().union(below()).fully_contains(&query));
        assert!(!far().union(away()).fully_contains(&query));
        assert!(Element::tuple(vec![far(), below()]).fully_contains(&query));

        assert!(below().intersection(above()).fully_contains(&query));
        assert!(!below().intersection(away()).fully_contains(&query));

        assert!(below().subtraction(away()).fully_contains(&query));
        assert!(!below().subtraction(above()).fully_contains(&query));
        assert!(!below().subtraction(below()).fully_contains(&query));

        let stacked = away().repeated(DVec3::new(0.0, 0.0, 200.0), 2);
        assert!(stacked.fully_contains(&query));
        assert!(!away().repeated(DVec3::new(0.0, 0.0, 200.0), 0).fully_contains(&query));
    }
}
