use lumen_core::{PixelCoord, ViewportSize};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{pixel_at_index, ratio, Batch, Batcher};

/// Upper bound on the random swaps performed when scrambling pixel order.
pub const MAX_SWAPS: usize = 10_000;

/// Serves pixels in scrambled order.
///
/// The raster order is permuted by up to [`MAX_SWAPS`] random swaps, then
/// served in chunks. A seed makes the order reproducible.
#[derive(Debug)]
pub struct RandomBatcher {
    batch_size: usize,
    seed: Option<u64>,
    order: Vec<PixelCoord>,
    next_index: usize,
}

impl RandomBatcher {
    pub fn new(batch_size: usize, seed: Option<u64>) -> Self {
        Self {
            batch_size: batch_size.max(1),
            seed,
            order: Vec::new(),
            next_index: 0,
        }
    }
}

impl Batcher for RandomBatcher {
    fn display_name(&self) -> &'static str {
        "Random"
    }

    fn initialize(&mut self, viewport: ViewportSize) {
        let count = viewport.pixel_count();
        self.order = (0..count).map(|i| pixel_at_index(viewport, i)).collect();
        self.next_index = 0;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let swaps = MAX_SWAPS.min(count);
        if count > 1 {
            for _ in 0..swaps {
                let a = rng.gen_range(0..count);
                let b = rng.gen_range(0..count);
                self.order.swap(a, b);
            }
        }
        log::debug!("Random batcher initialized: {count} pixels, {swaps} swaps");
    }

    fn has_batches(&self) -> bool {
        self.next_index < self.order.len()
    }

    fn progress(&self) -> f64 {
        ratio(self.next_index, self.order.len())
    }

    fn next_batch(&mut self) -> Option<Batch> {
        if !self.has_batches() {
            return None;
        }
        let end = (self.next_index + self.batch_size).min(self.order.len());
        let pixels = self.order[self.next_index..end].to_vec();
        self.next_index = end;

        Some(Batch::from_pixels(pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batcher::test_support::{covers_exactly_once, drain};

    #[test]
    fn test_seeded_order_is_reproducible() {
        let viewport = ViewportSize::new(16, 9);
        let a = drain(&mut RandomBatcher::new(10, Some(42)), viewport);
        let b = drain(&mut RandomBatcher::new(10, Some(42)), viewport);
        assert_eq!(a, b);
        assert!(covers_exactly_once(&a, viewport));
    }

    #[test]
    fn test_order_is_scrambled() {
        let viewport = ViewportSize::new(32, 32);
        let pixels = drain(&mut RandomBatcher::new(64, Some(1)), viewport);
        let raster: Vec<PixelCoord> = (0..viewport.pixel_count())
            .map(|i| pixel_at_index(viewport, i))
            .collect();
        assert_ne!(pixels, raster);
    }

    #[test]
    fn test_batch_sizes() {
        let mut batcher = RandomBatcher::new(4, Some(3));
        batcher.initialize(ViewportSize::new(5, 2));
        let sizes: Vec<usize> = std::iter::from_fn(|| batcher.next_batch())
            .map(|b| b.count())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }
}
