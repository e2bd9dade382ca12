use lumen_core::{PixelCoord, ViewportSize};

use super::{ratio, Batch, Batcher, ScanDirection};

/// Serves one full row (or column) per batch.
#[derive(Debug, Default)]
pub struct LinearBatcher {
    direction: ScanDirection,
    viewport: ViewportSize,
    line_count: u32,
    next_line: u32,
}

impl LinearBatcher {
    pub fn new(direction: ScanDirection) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }
}

impl Batcher for LinearBatcher {
    fn display_name(&self) -> &'static str {
        "Scanline"
    }

    fn initialize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.next_line = 0;
        self.line_count = if viewport.is_empty() {
            0
        } else {
            match self.direction {
                ScanDirection::Horizontal => viewport.height,
                ScanDirection::Vertical => viewport.width,
            }
        };
        log::debug!("Scanline batcher initialized with {} lines", self.line_count);
    }

    fn has_batches(&self) -> bool {
        self.next_line < self.line_count
    }

    fn progress(&self) -> f64 {
        ratio(self.next_line as usize, self.line_count as usize)
    }

    fn next_batch(&mut self) -> Option<Batch> {
        if !self.has_batches() {
            return None;
        }
        let line = self.next_line;
        self.next_line += 1;

        let batch = match self.direction {
            ScanDirection::Horizontal => {
                Batch::new((0..self.viewport.width).map(move |x| PixelCoord::new(x, line)))
            }
            ScanDirection::Vertical => {
                Batch::new((0..self.viewport.height).map(move |y| PixelCoord::new(line, y)))
            }
        };
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batcher::test_support::{covers_exactly_once, drain};

    #[test]
    fn test_rows_in_order() {
        let mut batcher = LinearBatcher::new(ScanDirection::Horizontal);
        batcher.initialize(ViewportSize::new(3, 2));

        let first: Vec<PixelCoord> = batcher.next_batch().unwrap().collect();
        assert_eq!(
            first,
            vec![PixelCoord::new(0, 0), PixelCoord::new(1, 0), PixelCoord::new(2, 0)]
        );
        assert_eq!(batcher.progress(), 0.5);
        assert!(batcher.next_batch().is_some());
        assert!(!batcher.has_batches());
        assert!(batcher.next_batch().is_none());
    }

    #[test]
    fn test_columns_cover_viewport() {
        let viewport = ViewportSize::new(7, 13);
        let pixels = drain(&mut LinearBatcher::new(ScanDirection::Vertical), viewport);
        assert!(covers_exactly_once(&pixels, viewport));
        assert_eq!(pixels[1], PixelCoord::new(0, 1));
    }
}
