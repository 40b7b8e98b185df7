use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the segmentation engine.
///
/// Only I/O-bound steps (decoding the room photo, loading cutout assets,
/// reading configuration) can fail. Every numeric stage is infallible.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image has no pixels")]
    EmptyImage,

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("failed to load asset {reference}: {source}")]
    AssetLoad {
        reference: String,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;
