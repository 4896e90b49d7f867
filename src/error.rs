//! Error types for the `gifwright` crate.
//!
//! This module defines [`GifError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to diagnose
//! the problem without additional logging at the call site, including file
//! paths, manifest line numbers, and upstream codec messages.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

use crate::validation::ValidationError;

/// The unified error type for all `gifwright` operations.
///
/// Every public method that can fail returns `Result<T, GifError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GifError {
    /// A frame selection was malformed or fell outside the source.
    #[error("Invalid frame selection: {0}")]
    InvalidSelection(String),

    /// A reorder or sequence parameter was rejected.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation is not meaningful for this source (e.g. selecting
    /// frame 3 of a still image).
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An input or output path failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The GIF stream could not be decoded.
    #[error("Failed to decode GIF: {0}")]
    GifDecodeError(String),

    /// GIF encoding failed.
    #[error("GIF encoding error: {0}")]
    GifEncodeError(String),

    /// A frame manifest could not be read or parsed.
    #[error("Invalid manifest {path} (line {line}): {reason}")]
    Manifest {
        /// Manifest file that was being read.
        path: PathBuf,
        /// 1-based line number of the offending row (0 for file-level issues).
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while loading or saving a frame.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<gif::DecodingError> for GifError {
    fn from(error: gif::DecodingError) -> Self {
        GifError::GifDecodeError(error.to_string())
    }
}

impl From<gif::EncodingError> for GifError {
    fn from(error: gif::EncodingError) -> Self {
        GifError::GifEncodeError(error.to_string())
    }
}
