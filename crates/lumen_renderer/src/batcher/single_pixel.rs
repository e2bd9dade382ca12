use lumen_core::{PixelCoord, ViewportSize};

use super::{Batch, Batcher};

/// Serves one configured pixel, once. Used for debugging a single ray path.
#[derive(Debug)]
pub struct SinglePixelBatcher {
    pixel: PixelCoord,
    served: bool,
}

impl SinglePixelBatcher {
    pub fn new(pixel: PixelCoord) -> Self {
        Self {
            pixel,
            served: false,
        }
    }
}

impl Batcher for SinglePixelBatcher {
    fn display_name(&self) -> &'static str {
        "Single pixel"
    }

    fn initialize(&mut self, viewport: ViewportSize) {
        self.served = false;
        if !viewport.contains(self.pixel) {
            log::warn!("Single pixel {:?} lies outside viewport {viewport:?}", self.pixel);
        }
    }

    fn has_batches(&self) -> bool {
        !self.served
    }

    fn progress(&self) -> f64 {
        if self.served {
            1.0
        } else {
            0.0
        }
    }

    fn next_batch(&mut self) -> Option<Batch> {
        if self.served {
            return None;
        }
        self.served = true;
        Some(Batch::from_pixels(vec![self.pixel]))
    }
}
