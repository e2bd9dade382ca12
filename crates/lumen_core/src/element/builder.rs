//! Chainable constructors for element trees.
//!
//! Elements built here carry id 0 until the owning scene attributes ids.

use lumen_math::{
    Aabb, BoundingSphere, Cube, Cylinder, DMat3, DVec3, Disk, Ellipsoid, Hyperplane, LineSegment,
    Plane, Sphere, Torus,
};

use super::{BoundedArray, Combination, Element, ElementKind, Geometry};
use crate::material::MaterialId;

impl Element {
    pub fn empty() -> Self {
        Self::new(ElementKind::Empty)
    }

    pub fn geometry(geometry: Geometry, material: Option<MaterialId>) -> Self {
        Self::new(ElementKind::Geometry { geometry, material })
    }

    pub fn sphere(center: DVec3, radius: f64, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Sphere(Sphere::new(center, radius)), material)
    }

    pub fn aabb(minimum: DVec3, maximum: DVec3, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Aabb(Aabb::from_points(minimum, maximum)), material)
    }

    pub fn cube(location: DVec3, side: f64, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Cube(Cube::new(location, side)), material)
    }

    pub fn cylinder(start: DVec3, end: DVec3, radius: f64, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Cylinder(Cylinder::new(start, end, radius)), material)
    }

    pub fn disk(center: DVec3, normal: DVec3, radius: f64, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Disk(Disk::new(center, normal, radius)), material)
    }

    pub fn ellipsoid(center: DVec3, radii: DVec3, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Ellipsoid(Ellipsoid::new(center, radii)), material)
    }

    pub fn plane(point: DVec3, normal: DVec3, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Plane(Plane::new(point, normal)), material)
    }

    /// Half-space behind `normal`.
    pub fn hyperplane(point: DVec3, normal: DVec3, material: Option<MaterialId>) -> Self {
        Self::geometry(Geometry::Hyperplane(Hyperplane::new(point, normal)), material)
    }

    pub fn torus(
        center: DVec3,
        axis: DVec3,
        major: f64,
        minor: f64,
        material: Option<MaterialId>,
    ) -> Self {
        Self::geometry(
            Geometry::Torus(Torus::new(center, axis, major, minor)),
            material,
        )
    }

    pub fn line_segment(start: DVec3, end: DVec3) -> Self {
        Self::geometry(Geometry::LineSegment(LineSegment::new(start, end)), None)
    }

    pub fn tuple(elements: Vec<Element>) -> Self {
        Self::new(ElementKind::Tuple(elements))
    }

    pub fn array(elements: Vec<Element>) -> Self {
        Self::new(ElementKind::Array(BoundedArray::new(elements)))
    }

    fn combination(self, other: Element) -> Combination {
        Combination {
            material: None,
            t0: Box::new(self),
            t1: Box::new(other),
        }
    }

    pub fn union(self, other: Element) -> Self {
        Self::new(ElementKind::Union(self.combination(other)))
    }

    pub fn intersection(self, other: Element) -> Self {
        Self::new(ElementKind::Intersection(self.combination(other)))
    }

    /// `self` with `other` carved out of it.
    pub fn subtraction(self, other: Element) -> Self {
        Self::new(ElementKind::Subtraction(self.combination(other)))
    }

    pub fn translated(self, translation: DVec3) -> Self {
        Self::new(ElementKind::Translate {
            translation,
            element: Box::new(self),
        })
    }

    pub fn scaled(self, factor: f64, center: DVec3) -> Self {
        Self::new(ElementKind::Scale {
            factor,
            center,
            element: Box::new(self),
        })
    }

    pub fn rotated(self, rotation: DMat3, center: DVec3) -> Self {
        Self::new(ElementKind::Rotate {
            rotation,
            center,
            element: Box::new(self),
        })
    }

    pub fn repeated(self, translation: DVec3, count: usize) -> Self {
        Self::new(ElementKind::RepeatTranslate {
            translation,
            count,
            element: Box::new(self),
        })
    }

    /// Translate so the center of the bounds lands on `point`. Unbounded
    /// elements are returned as is.
    pub fn centered_at(self, point: DVec3) -> Self {
        match self.bounds() {
            Some(bounds) => {
                let offset = point - bounds.center();
                self.translated(offset)
            }
            None => self,
        }
    }

    /// Wrap in a bounding box computed from the current bounds.
    pub fn bounding_box(self) -> Self {
        match self.bounds() {
            Some(bounds) => Self::new(ElementKind::BoundingBox {
                bounds,
                element: Box::new(self),
            }),
            None => self,
        }
    }

    /// Wrap in a bounding sphere enclosing the current bounds.
    pub fn bounding_sphere(self) -> Self {
        match self.bounds() {
            Some(bounds) => Self::new(ElementKind::BoundingSphere {
                sphere: BoundingSphere::from_bounds(&bounds),
                element: Box::new(self),
            }),
            None => self,
        }
    }

    /// Set the material of leaves, or the override of combinators.
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.set_material(material);
        self
    }

    fn set_material(&mut self, id: MaterialId) {
        match &mut self.kind {
            ElementKind::Empty => {}
            ElementKind::Geometry { material, .. } => *material = Some(id),
            ElementKind::Union(c) | ElementKind::Intersection(c) | ElementKind::Subtraction(c) => {
                c.material = Some(id)
            }
            _ => {
                for child in self.children_mut() {
                    child.set_material(id);
                }
            }
        }
    }
}
