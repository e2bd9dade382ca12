use std::path::{Path, PathBuf};

use lumen_core::{PixelCoord, ViewportSize};
use serde::{Deserialize, Serialize};

use crate::batcher::{
    Batcher, LineBatcher, LinearBatcher, RandomBatcher, ScanDirection, SieveBatcher,
    SinglePixelBatcher, TiledBatcher,
};
use crate::error::{RenderError, RenderResult};

/// Pixel scheduling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatcherKind {
    #[default]
    Tiled,
    Linear,
    Line,
    Random,
    Sieve,
    SinglePixel,
}

/// Render settings, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of worker threads
    pub thread_count: usize,
    /// Maximum reflection/refraction recursion depth
    pub max_bounces: u32,
    pub batcher: BatcherKind,
    /// Pixels per batch for the chunked batchers
    pub batch_size: usize,
    /// Tile side in pixels; derived from viewport and thread count when absent
    pub tile_size: Option<u32>,
    pub shuffle_tiles: bool,
    /// Seed for the random and shuffled-tile orders
    pub random_seed: Option<u64>,
    /// Pixel served by the single pixel batcher
    pub debug_pixel: PixelCoord,
    /// Distance at which geometry fully fades into the sky
    pub fog_distance: f64,
    /// PNG output path
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            thread_count: 8,
            max_bounces: 15,
            batcher: BatcherKind::Tiled,
            batch_size: 256,
            tile_size: None,
            shuffle_tiles: false,
            random_seed: None,
            debug_pixel: PixelCoord::default(),
            fog_distance: 1000.0,
            output: PathBuf::from("render.png"),
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RenderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.thread_count == 0 {
            return Err(RenderError::InvalidConfig(
                "thread_count must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(RenderError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.tile_size == Some(0) {
            return Err(RenderError::InvalidConfig(
                "tile_size must be at least 1".to_string(),
            ));
        }
        if !(self.fog_distance > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "fog_distance must be positive, got {}",
                self.fog_distance
            )));
        }
        Ok(())
    }

    pub fn viewport(&self) -> ViewportSize {
        ViewportSize::new(self.width, self.height)
    }

    /// Build the configured batcher. It still needs
    /// [`Batcher::initialize`] before use.
    pub fn make_batcher(&self) -> Box<dyn Batcher> {
        match self.batcher {
            BatcherKind::Tiled => {
                let tiled = match self.tile_size {
                    Some(size) => TiledBatcher::new(size),
                    None => TiledBatcher::splitting(self.viewport(), self.thread_count),
                };
                if self.shuffle_tiles {
                    Box::new(tiled.shuffled(self.random_seed))
                } else {
                    Box::new(tiled)
                }
            }
            BatcherKind::Linear => Box::new(LinearBatcher::new(ScanDirection::Horizontal)),
            BatcherKind::Line => Box::new(LineBatcher::new(ScanDirection::Horizontal, self.batch_size)),
            BatcherKind::Random => Box::new(RandomBatcher::new(self.batch_size, self.random_seed)),
            BatcherKind::Sieve => Box::new(SieveBatcher::new(self.batch_size)),
            BatcherKind::SinglePixel => Box::new(SinglePixelBatcher::new(self.debug_pixel)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.thread_count, 8);
        assert_eq!(config.max_bounces, 15);
        assert_eq!(config.batch_size, 256);
        assert_eq!(config.fog_distance, 1000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            RenderConfig::from_json_str(r#"{ "width": 64, "height": 48, "batcher": "sieve" }"#)
                .unwrap();
        assert_eq!(config.viewport(), ViewportSize::new(64, 48));
        assert_eq!(config.batcher, BatcherKind::Sieve);
        assert_eq!(config.max_bounces, 15);
        assert_eq!(config.make_batcher().display_name(), "Prime Sieve");
    }

    #[test]
    fn test_invalid_configs() {
        let zero_threads = RenderConfig {
            thread_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_threads.validate(),
            Err(RenderError::InvalidConfig(_))
        ));

        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "width": 0 }"#),
            Err(RenderError::InvalidConfig(_))
        ));
        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "batcher": "spiral" }"#),
            Err(RenderError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = RenderConfig::from_json_file("/nonexistent/lumen.json").unwrap_err();
        assert!(matches!(err, RenderError::ConfigRead { .. }));
    }

    #[test]
    fn test_make_batcher_names() {
        let names: Vec<&str> = [
            BatcherKind::Tiled,
            BatcherKind::Linear,
            BatcherKind::Line,
            BatcherKind::Random,
            BatcherKind::Sieve,
            BatcherKind::SinglePixel,
        ]
        .into_iter()
        .map(|batcher| {
            RenderConfig {
                batcher,
                ..Default::default()
            }
            .make_batcher()
            .display_name()
        })
        .collect();
        assert_eq!(
            names,
            ["Tiles", "Scanline", "Line", "Random", "Prime Sieve", "Single pixel"]
        );
    }
}
