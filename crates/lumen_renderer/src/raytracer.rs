//! Recursive Whitted-style raytracer over a CSG scene.

use std::sync::Arc;

use lumen_core::{
    Camera, Color, DiffuseMaterial, ElementId, Material, PixelCoord, RayHit, RayIgnore, Scene,
    ViewportSize,
};
use lumen_math::{DVec3, Ray};

use crate::config::RenderConfig;
use crate::noise::bump_normal;
use crate::shading::{fresnel, reflect, refract};

/// Offset applied to secondary ray origins along the surface normal.
pub const BIAS: f64 = 0.0001;

/// Entrances closer than this squared distance are treated as the surface a
/// secondary ray starts from.
pub const MIN_RAY_TOLERANCE_SQ: f64 = 0.00001;

pub const DEFAULT_MAX_BOUNCES: u32 = 15;
pub const DEFAULT_FOG_DISTANCE: f64 = 1000.0;

/// Shade floor for checkerboard surfaces.
const CHECKERBOARD_MIN_SHADE: f64 = 0.6;

/// Anything that can color a single pixel.
///
/// Renderers are shared by every worker thread of a render.
pub trait Renderer: Send + Sync {
    fn render(&self, pixel: PixelCoord) -> Color;

    /// Returns true if `render` may be called from several threads at once.
    fn is_multi_threaded(&self) -> bool {
        true
    }
}

/// Counters collected while tracing one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Calls into the recursive trace, primary ray included
    pub rays_cast: u32,
    /// Deepest bounce reached
    pub max_depth: u32,
}

pub struct Raytracer {
    scene: Arc<Scene>,
    camera: Camera,
    max_bounces: u32,
    fog_distance: f64,
}

impl Raytracer {
    pub fn new(scene: Arc<Scene>, camera: Camera) -> Self {
        Self {
            scene,
            camera,
            max_bounces: DEFAULT_MAX_BOUNCES,
            fog_distance: DEFAULT_FOG_DISTANCE,
        }
    }

    /// Raytracer with a default camera for the configured viewport.
    pub fn from_config(scene: Arc<Scene>, config: &RenderConfig) -> Self {
        Self::new(scene, Camera::new(config.viewport()))
            .with_max_bounces(config.max_bounces)
            .with_fog_distance(config.fog_distance)
    }

    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    pub fn with_fog_distance(mut self, fog_distance: f64) -> Self {
        self.fog_distance = fog_distance;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> ViewportSize {
        self.camera.viewport()
    }

    pub fn max_bounces(&self) -> u32 {
        self.max_bounces
    }

    /// Color of a pixel along with the tracing counters.
    pub fn render_with_stats(&self, pixel: PixelCoord) -> (Color, TraceStats) {
        let mut stats = TraceStats::default();
        let ray = self.camera.ray_at(pixel);
        let color = self.raytrace(ray, RayIgnore::None, 0, &mut stats);
        (color, stats)
    }

    fn raytrace(&self, ray: Ray, ignoring: RayIgnore, bounce: u32, stats: &mut TraceStats) -> Color {
        stats.rays_cast += 1;
        stats.max_depth = stats.max_depth.max(bounce);

        if bounce > self.max_bounces {
            return Color::TRANSPARENT_BLACK;
        }

        let Some(hit) = self.scene.intersect(ray, ignoring) else {
            return self.scene.sky_color;
        };
        // Geometry without a material is invisible.
        let Some(material) = self.scene.material(hit.material) else {
            return self.scene.sky_color;
        };

        self.compute_color(&ray, &hit, material, bounce, stats)
    }

    fn compute_color(
        &self,
        ray: &Ray,
        hit: &RayHit,
        material: &Material,
        bounce: u32,
        stats: &mut TraceStats,
    ) -> Color {
        let point = hit.point();

        let (mut color, normal) = match material {
            Material::Diffuse(diffuse) => {
                let normal = bump_normal(
                    hit.normal(),
                    point,
                    diffuse.bump_noise_frequency,
                    diffuse.bump_magnitude,
                );
                (self.diffuse_color(ray, hit, normal, diffuse, bounce, stats), normal)
            }
            Material::Checkerboard { .. } => {
                let shade = facing_ratio(ray, hit.normal()).max(CHECKERBOARD_MIN_SHADE);
                let color = material.color_at(point).faded(Color::BLACK, 1.0 - shade);
                (color, hit.normal())
            }
            Material::Target { .. } => {
                let shade = facing_ratio(ray, hit.normal());
                let color = material.color_at(point).faded(Color::BLACK, 1.0 - shade);
                (color, hit.normal())
            }
        };

        let shadow = self.shadow_at(point, normal, hit.id, material.transparency());
        if shadow > 0.0 {
            color = color.faded(Color::BLACK, 0.5 * shadow);
        } else {
            let sun_facing = normal.dot(-self.scene.sun_direction).max(0.0).powi(5).min(1.0);
            color = color.faded(Color::WHITE, sun_facing);
        }

        let fog = ray.start.distance_squared(point) / (self.fog_distance * self.fog_distance);
        color.faded(self.scene.sky_color, fog.clamp(0.0, 1.0))
    }

    fn diffuse_color(
        &self,
        ray: &Ray,
        hit: &RayHit,
        normal: DVec3,
        diffuse: &DiffuseMaterial,
        bounce: u32,
        stats: &mut TraceStats,
    ) -> Color {
        let mut color = diffuse.color.faded(self.scene.sky_color, diffuse.transparency);
        color = color.faded(Color::BLACK, 1.0 - facing_ratio(ray, normal));

        let (reflectance, transmittance) = fresnel(ray.direction, normal, diffuse.refractive_index);

        if diffuse.transparency > 0.0 && transmittance > 0.0 {
            let through = self.transmitted_color(ray, hit, normal, diffuse, bounce, stats);
            color = color.faded(through, diffuse.transparency * transmittance);
        }

        if diffuse.reflectivity > 0.0 && bounce < self.max_bounces {
            let origin = hit.point() + toward_origin(ray, normal) * BIAS;
            let reflected_ray = Ray::new(origin, reflect(ray.direction, normal));
            let reflected = self.raytrace(
                reflected_ray,
                hit.ray_ignore_for_hit(MIN_RAY_TOLERANCE_SQ),
                bounce + 1,
                stats,
            );

            let factor = if diffuse.has_refraction() {
                reflectance + (1.0 - diffuse.transparency)
            } else {
                reflectance + diffuse.reflectivity
            };
            color = color.faded(reflected, factor.clamp(0.0, 1.0));
        }

        color
    }

    /// Color seen through a transparent surface: the ray refracts into the
    /// element, travels to its exit point and refracts back out.
    fn transmitted_color(
        &self,
        ray: &Ray,
        hit: &RayHit,
        normal: DVec3,
        diffuse: &DiffuseMaterial,
        bounce: u32,
        stats: &mut TraceStats,
    ) -> Color {
        let straight = Ray::new(hit.point(), ray.direction);

        let through = refract(ray.direction, normal, diffuse.refractive_index)
            .and_then(|inward| {
                let inner = Ray::new(hit.point() - toward_origin(ray, normal) * BIAS, inward);
                let exit = self.scene.intersect_element(
                    hit.id,
                    inner,
                    RayIgnore::Entrance {
                        id: hit.id,
                        minimum_ray_length_squared: MIN_RAY_TOLERANCE_SQ,
                    },
                )?;
                // Exit normals face out of the volume, which is the side
                // `refract` expects for a ray leaving the medium.
                let outward = refract(inner.direction, exit.normal(), diffuse.refractive_index)?;
                let origin = exit.point() + outward.dot(exit.normal()).signum() * exit.normal() * BIAS;
                Some(Ray::new(origin, outward))
            })
            .unwrap_or(straight);

        self.raytrace(through, RayIgnore::Full(hit.id), bounce + 1, stats)
    }

    /// Shadow ratio of a surface point: 0 is fully lit, 1 fully shadowed.
    ///
    /// Every element between the point and the sun dims it by its opacity.
    /// `id` is the element the point lies on; it never shadows itself along
    /// the sun ray.
    pub fn shadow_at(&self, point: DVec3, normal: DVec3, id: ElementId, transparency: f64) -> f64 {
        let to_sun = -self.scene.sun_direction;
        if normal.dot(to_sun) < 0.0 && transparency == 0.0 {
            return 1.0;
        }

        let hits = self
            .scene
            .intersect_all(Ray::new(point, to_sun), RayIgnore::Full(id));
        let passed: f64 = hits
            .iter()
            .map(|h| self.scene.material(h.material).map_or(1.0, Material::transparency))
            .product();

        (1.0 - passed).clamp(0.0, 1.0)
    }

    /// Shadow ratio for a hit, using the hit's own material.
    pub fn shadow_for_hit(&self, hit: &RayHit) -> f64 {
        let transparency = self
            .scene
            .material(hit.material)
            .map_or(0.0, Material::transparency);
        self.shadow_at(hit.point(), hit.normal(), hit.id, transparency)
    }
}

impl Renderer for Raytracer {
    fn render(&self, pixel: PixelCoord) -> Color {
        self.render_with_stats(pixel).0
    }
}

/// `clamp(n · -d, 0, 1)`: 1 when the surface faces the ray head-on.
fn facing_ratio(ray: &Ray, normal: DVec3) -> f64 {
    normal.dot(-ray.direction).clamp(0.0, 1.0)
}

/// The normal flipped, if needed, to the side the ray arrived from.
fn toward_origin(ray: &Ray, normal: DVec3) -> DVec3 {
    if normal.dot(ray.direction) <= 0.0 {
        normal
    } else {
        -normal
    }
}
