//! Errors surfaced by the demos.

use std::path::PathBuf;

use chroma_gpu::GpuError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::pixel_filter::FilterError;

#[derive(Debug, Error)]
pub enum DemoError {
    /// The source image could not be opened or decoded.
    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path:?}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, DemoError>;
