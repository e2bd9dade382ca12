//! Pixel scheduling strategies.
//!
//! A batcher hands out [`Batch`]es of pixel coordinates to render workers.
//! Started from [`Batcher::initialize`], every batcher except
//! [`SinglePixelBatcher`] serves each pixel of the viewport exactly once.

mod line;
mod linear;
mod random;
mod sieve;
mod single_pixel;
mod tiled;

pub use line::LineBatcher;
pub use linear::LinearBatcher;
pub use random::RandomBatcher;
pub use sieve::SieveBatcher;
pub use single_pixel::SinglePixelBatcher;
pub use tiled::TiledBatcher;

use lumen_core::{PixelCoord, ViewportSize};

/// Primary axis for batchers that walk the viewport in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanDirection {
    /// Along X, wrapping to the next row.
    #[default]
    Horizontal,
    /// Along Y, wrapping to the next column.
    Vertical,
}

/// An owned sequence of pixels for one worker to render.
pub struct Batch {
    pixels: Box<dyn Iterator<Item = PixelCoord> + Send>,
}

impl Batch {
    pub fn new(pixels: impl Iterator<Item = PixelCoord> + Send + 'static) -> Self {
        Self {
            pixels: Box::new(pixels),
        }
    }

    pub fn from_pixels(pixels: Vec<PixelCoord>) -> Self {
        Self::new(pixels.into_iter())
    }
}

impl Iterator for Batch {
    type Item = PixelCoord;

    fn next(&mut self) -> Option<PixelCoord> {
        self.pixels.next()
    }
}

impl std::fmt::Debug for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch").finish_non_exhaustive()
    }
}

/// Produces batches of pixels to render.
///
/// Batchers are driven by one worker at a time, behind the coordinator's
/// batch lock.
pub trait Batcher: Send {
    /// Name shown to users.
    fn display_name(&self) -> &'static str;

    /// Reset to the first batch for a viewport. Must be called before
    /// [`Batcher::next_batch`].
    fn initialize(&mut self, viewport: ViewportSize);

    /// `false` once every batch has been served.
    fn has_batches(&self) -> bool;

    /// Share of work served so far, in [0, 1].
    fn progress(&self) -> f64;

    /// The next batch, or `None` when all batches have been served.
    fn next_batch(&mut self) -> Option<Batch>;
}

/// Pixel at a row-major linear index.
pub(crate) fn pixel_at_index(viewport: ViewportSize, index: usize) -> PixelCoord {
    let width = viewport.width.max(1) as usize;
    PixelCoord::new((index % width) as u32, (index / width) as u32)
}

/// Served/total ratio, 1.0 for empty work.
pub(crate) fn ratio(served: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        (served as f64 / total as f64).min(1.0)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Drain a batcher and return every pixel it served, in order.
    pub fn drain(batcher: &mut dyn Batcher, viewport: ViewportSize) -> Vec<PixelCoord> {
        batcher.initialize(viewport);
        let mut pixels = Vec::new();
        while let Some(batch) = batcher.next_batch() {
            pixels.extend(batch);
        }
        pixels
    }

    /// Returns true if `pixels` covers the viewport exactly once each.
    pub fn covers_exactly_once(pixels: &[PixelCoord], viewport: ViewportSize) -> bool {
        let mut seen = vec![false; viewport.pixel_count()];
        for pixel in pixels {
            if !viewport.contains(*pixel) {
                return false;
            }
            let index = pixel.y as usize * viewport.width as usize + pixel.x as usize;
            if std::mem::replace(&mut seen[index], true) {
                return false;
            }
        }
        seen.iter().all(|s| *s)
    }
}
