use lumen_core::{PixelCoord, ViewportSize};

use super::{ratio, Batch, Batcher, ScanDirection};

/// Raster scan served in fixed-size chunks, wrapping at the viewport edge.
#[derive(Debug)]
pub struct LineBatcher {
    direction: ScanDirection,
    batch_size: usize,
    viewport: ViewportSize,
    next_index: usize,
}

impl LineBatcher {
    pub fn new(direction: ScanDirection, batch_size: usize) -> Self {
        Self {
            direction,
            batch_size: batch_size.max(1),
            viewport: ViewportSize::default(),
            next_index: 0,
        }
    }

    fn pixel_at(&self, index: usize) -> PixelCoord {
        match self.direction {
            ScanDirection::Horizontal => {
                let width = self.viewport.width as usize;
                PixelCoord::new((index % width) as u32, (index / width) as u32)
            }
            ScanDirection::Vertical => {
                let height = self.viewport.height as usize;
                PixelCoord::new((index / height) as u32, (index % height) as u32)
            }
        }
    }
}

impl Batcher for LineBatcher {
    fn display_name(&self) -> &'static str {
        "Line"
    }

    fn initialize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.next_index = 0;
        log::debug!(
            "Line batcher initialized: {} pixels in chunks of {}",
            viewport.pixel_count(),
            self.batch_size
        );
    }

    fn has_batches(&self) -> bool {
        self.next_index < self.viewport.pixel_count()
    }

    fn progress(&self) -> f64 {
        ratio(self.next_index, self.viewport.pixel_count())
    }

    fn next_batch(&mut self) -> Option<Batch> {
        if !self.has_batches() {
            return None;
        }
        let end = (self.next_index + self.batch_size).min(self.viewport.pixel_count());
        let pixels = (self.next_index..end).map(|i| self.pixel_at(i)).collect();
        self.next_index = end;

        Some(Batch::from_pixels(pixels))
    }
}
