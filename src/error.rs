use thiserror::Error;

use crate::layout::{GeometryError, LayerError};
use crate::placement::PlacementError;
use crate::tech::ConfigError;

#[derive(Debug, Error)]
pub enum CellgenError {
    #[error("placement error: {0}")]
    Placement(#[from] PlacementError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse placement: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<LayerError> for CellgenError {
    fn from(value: LayerError) -> Self {
        match value {
            LayerError::Config(e) => Self::Config(e),
            LayerError::Geometry(e) => Self::Geometry(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, CellgenError>;
