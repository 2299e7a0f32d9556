//! Custom error types for imgclass.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the imgclass library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to decode an image file.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeFailure,
    },

    /// Requested resample size has a zero dimension.
    #[error("invalid dimensions {height}x{width}: height and width must be positive")]
    InvalidDimensions { height: usize, width: usize },

    /// Label list and score vector do not line up.
    #[error("label/score mismatch: {labels} labels but {scores} scores")]
    Alignment { labels: usize, scores: usize },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The external inference engine reported a failure.
    #[error("inference failed: {reason}")]
    Inference { reason: String },

    /// IO error while writing a report or preview.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an image could not be turned into pixel data.
#[derive(Error, Debug)]
pub enum DecodeFailure {
    /// The file could not be opened.
    #[error("{0}")]
    Io(#[source] std::io::Error),

    /// The container is unknown, truncated, or corrupt.
    #[error("{0}")]
    Image(#[from] image::ImageError),

    /// The image decoded to no pixels.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Result type alias for imgclass operations.
pub type Result<T> = std::result::Result<T, Error>;
