//! Lumen Core - Scene elements and ray bookkeeping for the lumen raytracer.
//!
//! This crate provides:
//!
//! - **Element tree**: leaf geometry, tuples, bounded arrays, CSG
//!   combinators, transforms and bounding wrappers, all behind [`Element`]
//! - **Ray bookkeeping**: [`RayQuery`], [`RayHit`], [`SortedRayHits`] and
//!   [`RayIgnore`] rules for follow-up casts
//! - **Scene data**: [`Scene`], [`Material`]s, [`Color`] and the plane [`Camera`]
//!
//! # Example
//!
//! ```
//! use lumen_core::{Color, Element, Material, MaterialMap, RayIgnore, Scene};
//! use lumen_math::{DVec3, Ray};
//!
//! let mut materials = MaterialMap::new();
//! let red = materials.push(Material::solid(Color::RED)).unwrap();
//!
//! let root = Element::sphere(DVec3::ZERO, 10.0, Some(red))
//!     .subtraction(Element::sphere(DVec3::new(15.0, 0.0, 0.0), 10.0, None));
//! let scene = Scene::new(root, materials);
//!
//! let hit = scene
//!     .intersect(Ray::new(DVec3::new(-20.0, 0.0, 0.0), DVec3::X), RayIgnore::None)
//!     .unwrap();
//! assert_eq!(hit.material, Some(red));
//! ```

pub mod camera;
pub mod color;
pub mod element;
pub mod error;
pub mod material;
pub mod ray_hit;
pub mod ray_ignore;
pub mod ray_query;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, PixelCoord, Projection, ViewportSize};
pub use color::Color;
pub use element::{
    describe, walk, BoundedArray, Combination, Element, ElementId, ElementIdFactory, ElementKind,
    ElementLabeler, ElementVisitor, Geometry,
};
pub use error::{SceneError, SceneResult};
pub use material::{DiffuseMaterial, Material, MaterialId, MaterialMap};
pub use ray_hit::{HitDirection, HitZipper, RayHit, SortedRayHits, Zipped};
pub use ray_ignore::RayIgnore;
pub use ray_query::RayQuery;
pub use scene::Scene;
