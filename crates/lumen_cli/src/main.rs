use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use lumen_renderer::{PixelBuffer, Raytracer, RenderConfig, RenderState, RendererCoordinator};

mod demo;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

fn load_config() -> Result<RenderConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => RenderConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            log::info!("No config given, using defaults");
            Ok(RenderConfig::default())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    config.validate().context("Invalid render configuration")?;

    let scene = Arc::new(demo::demo_scene().context("Failed to build demo scene")?);
    log::info!(
        "Rendering {} elements at {}x{} with {} threads ({:?} batcher)",
        scene.element_count(),
        config.width,
        config.height,
        config.thread_count,
        config.batcher
    );

    let raytracer = Arc::new(Raytracer::from_config(scene, &config));
    let buffer = Arc::new(PixelBuffer::new(config.viewport()));
    let mut coordinator = RendererCoordinator::from_config(raytracer, buffer.clone(), &config);
    let events = coordinator.subscribe();

    let started = Instant::now();
    coordinator.start().context("Failed to start render workers")?;

    loop {
        match events.recv_timeout(PROGRESS_INTERVAL) {
            Ok(change) if change.new.is_terminal() => break,
            Ok(_) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                log::info!("Progress: {:.1}%", coordinator.progress() * 100.0);
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    let state = coordinator.wait();
    log::info!("Render {state} after {:.2?}", started.elapsed());
    if state != RenderState::Finished {
        anyhow::bail!("Render ended in state {state}");
    }

    buffer
        .save_png(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!("Wrote {}", config.output.display());

    Ok(())
}
