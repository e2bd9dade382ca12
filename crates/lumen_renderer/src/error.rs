use thiserror::Error;

/// Errors that can occur while configuring or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn render worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("Failed to export image: {0}")]
    ImageExport(#[from] image::ImageError),

    #[error("Failed to parse render configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to read render configuration {}: {source}", path.display())]
    ConfigRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Result type for render setup and export.
pub type RenderResult<T> = Result<T, RenderError>;
