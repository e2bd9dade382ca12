//! The immutable scene handed to renderers.
//!
//! A scene owns the element tree and the material table. Ids are attributed
//! once, in [`Scene::new`], and never change afterwards, so the scene can be
//! shared read-only across render threads.

use lumen_math::{DVec3, Ray};

use crate::color::Color;
use crate::element::{describe, Element, ElementId, ElementIdFactory};
use crate::error::{SceneError, SceneResult};
use crate::material::{Material, MaterialId, MaterialMap};
use crate::ray_hit::{RayHit, SortedRayHits};
use crate::ray_ignore::RayIgnore;
use crate::ray_query::RayQuery;

/// Element tree plus lighting and materials.
#[derive(Debug, Clone)]
pub struct Scene {
    pub root: Element,

    /// Color returned by rays that escape the scene
    pub sky_color: Color,

    /// Direction sunlight travels in (normalized)
    pub sun_direction: DVec3,

    pub materials: MaterialMap,

    element_count: usize,
}

impl Scene {
    pub fn default_sun_direction() -> DVec3 {
        DVec3::new(-20.0, 40.0, -30.0).normalize()
    }

    /// Build a scene, attributing ids to every element of `root`.
    pub fn new(mut root: Element, materials: MaterialMap) -> Self {
        let mut factory = ElementIdFactory::new();
        root.attribute_ids(&mut factory);

        let element_count = factory.issued();
        log::info!(
            "Scene built: {} elements, {} materials",
            element_count,
            materials.len()
        );
        log::debug!("Scene tree:\n{}", describe(&root));

        Self {
            root,
            sky_color: Color::CORNFLOWER_BLUE,
            sun_direction: Self::default_sun_direction(),
            materials,
            element_count,
        }
    }

    pub fn with_sky_color(mut self, sky_color: Color) -> Self {
        self.sky_color = sky_color;
        self
    }

    pub fn with_sun_direction(mut self, sun_direction: DVec3) -> Self {
        self.sun_direction = sun_direction.normalize_or_zero();
        self
    }

    /// Number of elements in the tree.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Nearest hit along `ray`, honoring `ignoring`.
    pub fn intersect(&self, ray: Ray, ignoring: RayIgnore) -> Option<RayHit> {
        self.root.raycast(RayQuery::new(ray, ignoring)).last_hit
    }

    /// Nearest hit along `ray` on element `id` alone, ignoring every other
    /// element of the scene.
    pub fn intersect_element(&self, id: ElementId, ray: Ray, ignoring: RayIgnore) -> Option<RayHit> {
        self.root
            .raycast_within(id, RayQuery::new(ray, ignoring))?
            .last_hit
    }

    /// Every hit along `ray`, nearest first.
    pub fn intersect_all(&self, ray: Ray, ignoring: RayIgnore) -> SortedRayHits {
        let mut hits = SortedRayHits::new();
        self.root.raycast_all(&RayQuery::new(ray, ignoring), &mut hits);
        hits
    }

    /// Material of a hit, if it has one registered.
    pub fn material(&self, id: Option<MaterialId>) -> Option<&Material> {
        id.and_then(|id| self.materials.get(id))
    }

    pub fn element(&self, id: ElementId) -> SceneResult<&Element> {
        self.root.query(id).ok_or(SceneError::UnknownElement(id))
    }
}
