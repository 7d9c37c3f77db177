/// Error types shared across the application
///
/// None of these reach the user directly: the browser degrades a failed
/// listing to "no images" and a failed decode to "no preview". They exist
/// so the failure can be logged with enough context to act on.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while listing or reading bundled assets
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("invalid asset name: {0:?}")]
    InvalidName(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

/// Failures while loading the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
