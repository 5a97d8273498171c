// ABOUTME: Error types for the slidepack build-plan generator
// ABOUTME: Provides structured error handling for resolution, discovery and assembly

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0:?}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Pages {first:?} and {second:?} both render to {name}.html")]
    DuplicatePage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Step {referrer} (#{referrer_index}) references {file} before it is produced by {producer} (#{producer_index})")]
    StepOrder {
        file: String,
        referrer: &'static str,
        referrer_index: usize,
        producer: &'static str,
        producer_index: usize,
    },

    #[error("Invalid glob pattern {pattern}: {message}")]
    GlobPattern { pattern: String, message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, BuildError>;
