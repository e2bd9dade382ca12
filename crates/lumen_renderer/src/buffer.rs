//! Pixel sinks shared by render workers.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use lumen_core::{Color, ViewportSize};

use crate::error::RenderResult;

/// Destination for rendered pixels.
///
/// Writers are shared across worker threads, so writes take `&self`.
/// Workers never write the same pixel concurrently.
pub trait BufferWriter: Send + Sync {
    fn size(&self) -> ViewportSize;

    fn clear_all(&self, color: Color);

    /// Out-of-bounds coordinates are ignored.
    fn set_pixel(&self, x: u32, y: u32, color: Color);
}

/// Lock-free RGBA8 image, one packed atomic per pixel.
pub struct PixelBuffer {
    size: ViewportSize,
    pixels: Vec<AtomicU32>,
}

impl PixelBuffer {
    pub fn new(size: ViewportSize) -> Self {
        let pixels = (0..size.pixel_count())
            .map(|_| AtomicU32::new(Color::TRANSPARENT_BLACK.to_u32()))
            .collect();
        Self { size, pixels }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| y as usize * self.size.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let index = self.index(x, y)?;
        Some(Color::from_u32(self.pixels[index].load(Ordering::Relaxed)))
    }

    /// Row-major RGBA bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&Color::from_u32(pixel.load(Ordering::Relaxed)).to_rgba_bytes());
        }
        bytes
    }

    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.size.width, self.size.height, |x, y| {
            image::Rgba(
                self.pixel(x, y)
                    .unwrap_or(Color::TRANSPARENT_BLACK)
                    .to_rgba_bytes(),
            )
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

impl BufferWriter for PixelBuffer {
    fn size(&self) -> ViewportSize {
        self.size
    }

    fn clear_all(&self, color: Color) {
        let value = color.to_u32();
        for pixel in &self.pixels {
            pixel.store(value, Ordering::Relaxed);
        }
    }

    fn set_pixel(&self, x: u32, y: u32, color: Color) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index].store(color.to_u32(), Ordering::Relaxed);
        }
    }
}
