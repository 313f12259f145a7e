//! Error types for configuration and layout loading.
//!
//! The scroll-spy itself never fails; everything here comes from user input
//! (config files, layout files, options passed from JavaScript).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A `rootMargin` string that the visibility facility would reject.
    #[error("invalid root margin '{input}': {reason}")]
    InvalidRootMargin { input: String, reason: String },

    /// Threshold outside `[0, 1]` or not a number.
    #[error("invalid threshold {0}: must be between 0 and 1")]
    InvalidThreshold(f64),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not determine config directory")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, Error>;
