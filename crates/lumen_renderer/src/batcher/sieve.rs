use lumen_core::ViewportSize;

use super::{pixel_at_index, ratio, Batch, Batcher};

/// Serves pixels in a sieve-of-Eratosthenes pattern over raster indices.
///
/// For each prime `p` up to the square root of the pixel count, one batch
/// holds the multiples of `p` not yet served. Whatever remains is then swept
/// in raster order, `batch_size` pixels at a time.
#[derive(Debug)]
pub struct SieveBatcher {
    batch_size: usize,
    viewport: ViewportSize,
    served: Vec<bool>,
    served_count: usize,
    primes: Vec<usize>,
    next_prime: usize,
    sweep_cursor: usize,
}

impl SieveBatcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            viewport: ViewportSize::default(),
            served: Vec::new(),
            served_count: 0,
            primes: Vec::new(),
            next_prime: 0,
            sweep_cursor: 0,
        }
    }

    fn take(&mut self, indices: Vec<usize>) -> Batch {
        for &i in &indices {
            self.served[i] = true;
        }
        self.served_count += indices.len();
        let viewport = self.viewport;
        Batch::new(indices.into_iter().map(move |i| pixel_at_index(viewport, i)))
    }
}

/// Primes `<= limit`.
pub(crate) fn primes_up_to(limit: usize) -> Vec<usize> {
    if limit < 2 {
        return Vec::new();
    }
    let mut composite = vec![false; limit + 1];
    let mut primes = Vec::new();
    for n in 2..=limit {
        if composite[n] {
            continue;
        }
        primes.push(n);
        for multiple in (n * n..=limit).step_by(n) {
            composite[multiple] = true;
        }
    }
    primes
}

impl Batcher for SieveBatcher {
    fn display_name(&self) -> &'static str {
        "Prime Sieve"
    }

    fn initialize(&mut self, viewport: ViewportSize) {
        let count = viewport.pixel_count();
        self.viewport = viewport;
        self.served = vec![false; count];
        self.served_count = 0;
        self.primes = primes_up_to((count as f64).sqrt() as usize);
        self.next_prime = 0;
        self.sweep_cursor = 0;
        log::debug!(
            "Prime sieve batcher initialized: {count} pixels, {} primes",
            self.primes.len()
        );
    }

    fn has_batches(&self) -> bool {
        self.served_count < self.served.len()
    }

    fn progress(&self) -> f64 {
        ratio(self.served_count, self.served.len())
    }

    fn next_batch(&mut self) -> Option<Batch> {
        let count = self.served.len();

        while let Some(&prime) = self.primes.get(self.next_prime) {
            self.next_prime += 1;
            let indices: Vec<usize> = (prime..count)
                .step_by(prime)
                .filter(|&i| !self.served[i])
                .collect();
            if !indices.is_empty() {
                return Some(self.take(indices));
            }
        }

        let mut indices = Vec::with_capacity(self.batch_size);
        while self.sweep_cursor < count && indices.len() < self.batch_size {
            if !self.served[self.sweep_cursor] {
                indices.push(self.sweep_cursor);
            }
            self.sweep_cursor += 1;
        }
        if indices.is_empty() {
            None
        } else {
            Some(self.take(indices))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batcher::test_support::{covers_exactly_once, drain};

    #[test]
    fn test_primes_up_to() {
        assert_eq!(primes_up_to(1), Vec::<usize>::new());
        assert_eq!(primes_up_to(2), vec![2]);
        assert_eq!(primes_up_to(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_first_batches_follow_primes() {
        let mut batcher = SieveBatcher::new(100);
        batcher.initialize(ViewportSize::new(10, 10));

        let evens: Vec<u32> = batcher.next_batch().unwrap().map(|p| p.y * 10 + p.x).collect();
        assert_eq!(evens.len(), 49);
        assert!(evens.iter().all(|i| i % 2 == 0));

        let threes: Vec<u32> = batcher.next_batch().unwrap().map(|p| p.y * 10 + p.x).collect();
        assert_eq!(threes[..3], [3, 9, 15]);
        assert!((batcher.progress() - 0.66).abs() < 1e-12);
    }

    #[test]
    fn test_sieve_covers_viewport() {
        for viewport in [ViewportSize::new(1, 1), ViewportSize::new(7, 13), ViewportSize::new(64, 64)] {
            let mut batcher = SieveBatcher::new(16);
            let pixels = drain(&mut batcher, viewport);
            assert!(covers_exactly_once(&pixels, viewport), "{viewport:?}");
            assert!(!batcher.has_batches());
        }
    }
}
