//! Lumen Renderer - multi-threaded CPU raytracing of lumen scenes.
//!
//! A [`Raytracer`] colors one pixel at a time. The [`RendererCoordinator`]
//! runs it across a pool of worker threads that pull pixels from a
//! [`Batcher`] and write them into a shared [`BufferWriter`] such as
//! [`PixelBuffer`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lumen_core::{Color, Element, Material, MaterialMap, Scene};
//! use lumen_math::DVec3;
//! use lumen_renderer::{PixelBuffer, Raytracer, RenderConfig, RenderState, RendererCoordinator};
//!
//! let mut materials = MaterialMap::new();
//! let red = materials.push(Material::solid(Color::RED)).unwrap();
//! let scene = Scene::new(Element::sphere(DVec3::new(0.0, 90.0, 20.0), 20.0, Some(red)), materials);
//!
//! let config = RenderConfig { width: 32, height: 24, thread_count: 2, ..Default::default() };
//! let raytracer = Arc::new(Raytracer::from_config(Arc::new(scene), &config));
//! let buffer = Arc::new(PixelBuffer::new(config.viewport()));
//!
//! let mut coordinator = RendererCoordinator::from_config(raytracer, buffer.clone(), &config);
//! coordinator.start().unwrap();
//! assert_eq!(coordinator.wait(), RenderState::Finished);
//! ```

pub mod batcher;
pub mod buffer;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod noise;
pub mod raytracer;
pub mod shading;
mod worker;

pub use batcher::{
    Batch, Batcher, LineBatcher, LinearBatcher, RandomBatcher, ScanDirection, SieveBatcher,
    SinglePixelBatcher, TiledBatcher,
};
pub use buffer::{BufferWriter, PixelBuffer};
pub use config::{BatcherKind, RenderConfig};
pub use coordinator::{RenderState, RendererCoordinator, StateChange};
pub use error::{RenderError, RenderResult};
pub use raytracer::{Raytracer, Renderer, TraceStats};
