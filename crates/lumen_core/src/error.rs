use thiserror::Error;

use crate::element::ElementId;
use crate::material::MaterialId;

/// Errors that can occur while building a scene.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("No element with id {0} in scene")]
    UnknownElement(ElementId),

    #[error("Material id {0} defined more than once")]
    DuplicateMaterial(MaterialId),

    #[error("Invalid material {id}: {reason}")]
    InvalidMaterial { id: MaterialId, reason: String },
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;
