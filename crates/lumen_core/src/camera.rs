//! Plane camera that turns viewport pixels into world rays.

use lumen_math::{DVec2, DVec3, Ray};
use serde::{Deserialize, Serialize};

/// Size of the render target in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, pixel: PixelCoord) -> bool {
        pixel.x < self.width && pixel.y < self.height
    }
}

/// Integer pixel position, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

impl PixelCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Rays fan out from a point `center_offset` units along the plane normal.
    Perspective { center_offset: f64 },
    /// Every ray travels along the plane normal.
    Orthographic,
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            center_offset: -90.0,
        }
    }
}

/// Camera whose image lies on a plane in world space.
#[derive(Debug, Clone)]
pub struct Camera {
    plane_point: DVec3,
    normal: DVec3,
    right: DVec3,
    up: DVec3,
    projection: Projection,
    z_offset: f64,
    size_in_world: DVec2,
    downsize: f64,
    size_scale: f64,
    viewport: ViewportSize,
}

impl Camera {
    pub fn new(viewport: ViewportSize) -> Self {
        let normal = DVec3::new(0.0, 5.0, -1.0).normalize();
        let right = normal.cross(DVec3::Z).normalize();
        let up = right.cross(normal).normalize();

        let mut camera = Self {
            plane_point: DVec3::Z * 5.0,
            normal,
            right,
            up,
            projection: Projection::default(),
            z_offset: 0.0,
            size_in_world: DVec2::new(400.0, 300.0),
            downsize: 0.3,
            size_scale: 0.1,
            viewport,
        };
        camera.recompute();
        camera
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_z_offset(mut self, z_offset: f64) -> Self {
        self.z_offset = z_offset;
        self.recompute();
        self
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.recompute();
    }

    fn recompute(&mut self) {
        let viewport = DVec2::new(
            self.viewport.width.max(1) as f64,
            self.viewport.height.max(1) as f64,
        );
        self.size_scale = (self.size_in_world / viewport).max_element() * self.downsize;
        self.plane_point.z = self.viewport.height as f64 * self.size_scale + self.z_offset;
    }

    /// Point on the image plane for a pixel.
    pub fn plane_point_at(&self, pixel: PixelCoord) -> DVec3 {
        let centered_x = pixel.x as i64 - (self.viewport.width / 2) as i64;
        let centered_y = -(pixel.y as i64 - (self.viewport.height / 2) as i64);
        let projected = DVec2::new(centered_x as f64, centered_y as f64) * self.size_scale;

        self.plane_point + self.right * projected.x + self.up * projected.y
    }

    pub fn ray_at(&self, pixel: PixelCoord) -> Ray {
        let start = self.plane_point_at(pixel);
        let direction = match self.projection {
            Projection::Perspective { center_offset } => {
                start - (self.plane_point + self.normal * center_offset)
            }
            Projection::Orthographic => self.normal,
        };
        Ray::new(start, direction)
    }
}
