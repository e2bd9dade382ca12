use lumen_core::{PixelCoord, ViewportSize};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{ratio, Batch, Batcher};

/// Rectangular region of the viewport, clipped to its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn pixels(self) -> impl Iterator<Item = PixelCoord> + Send {
        (0..self.height)
            .flat_map(move |dy| (0..self.width).map(move |dx| PixelCoord::new(self.x + dx, self.y + dy)))
    }
}

/// Serves one tile per batch.
///
/// Tiles are square, laid out row by row from the top-left corner; edge
/// tiles are clipped. Optionally the tile order is shuffled.
#[derive(Debug)]
pub struct TiledBatcher {
    tile_size: u32,
    shuffle: bool,
    seed: Option<u64>,
    tiles: Vec<Tile>,
    next_tile: usize,
}

impl TiledBatcher {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            shuffle: false,
            seed: None,
            tiles: Vec::new(),
            next_tile: 0,
        }
    }

    /// Tiles sized so the longer viewport axis splits into twice as many
    /// tiles as there are worker threads.
    pub fn splitting(viewport: ViewportSize, thread_count: usize) -> Self {
        let divisions = (thread_count.max(1) * 2) as u32;
        Self::new((viewport.width / divisions).max(viewport.height / divisions))
    }

    pub fn shuffled(mut self, seed: Option<u64>) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

impl Batcher for TiledBatcher {
    fn display_name(&self) -> &'static str {
        "Tiles"
    }

    fn initialize(&mut self, viewport: ViewportSize) {
        self.tiles.clear();
        self.next_tile = 0;

        let step = self.tile_size as usize;
        for y in (0..viewport.height).step_by(step) {
            for x in (0..viewport.width).step_by(step) {
                self.tiles.push(Tile {
                    x,
                    y,
                    width: self.tile_size.min(viewport.width - x),
                    height: self.tile_size.min(viewport.height - y),
                });
            }
        }

        if self.shuffle {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            self.tiles.shuffle(&mut rng);
        }

        log::debug!(
            "Tile batcher initialized: {} tiles of side {}",
            self.tiles.len(),
            self.tile_size
        );
    }

    fn has_batches(&self) -> bool {
        self.next_tile < self.tiles.len()
    }

    fn progress(&self) -> f64 {
        ratio(self.next_tile, self.tiles.len())
    }

    fn next_batch(&mut self) -> Option<Batch> {
        let tile = *self.tiles.get(self.next_tile)?;
        self.next_tile += 1;
        Some(Batch::new(tile.pixels()))
    }
}
