//! Core [`GifFile`] implementation.
//!
//! `GifFile` is the main entry point for the crate. It validates and decodes
//! an animated GIF once, caches the composited frames and metadata, and
//! offers frame extraction and reordering on top of them.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use crate::codec::{self, DecodedGif};
use crate::configuration::{ExtractOptions, ReverseOptions};
use crate::error::GifError;
use crate::extract::{self, ExtractionReport};
use crate::metadata::GifMetadata;
use crate::reorder::{self, ReorderPolicy};
use crate::reverse::{self, ReverseReport};
use crate::selection::{self, SelectionPolicy};
use crate::sequence::FrameSequence;
use crate::validation::{self, ValidationReport};

/// A decoded GIF and its cached metadata.
///
/// Created via [`GifFile::open`]. All frames are held in memory as RGBA
/// canvases, so every operation works on the composited picture a viewer
/// would show rather than on raw sub-rectangles.
///
/// # Example
///
/// ```no_run
/// use gifwright::{GifFile, ReorderPolicy, ReverseOptions};
///
/// let gif = GifFile::open("input.gif")?;
/// println!("{} frames", gif.metadata().frame_count);
///
/// gif.reverse("reversed.gif", &ReorderPolicy::Simple, &ReverseOptions::new())?;
/// # Ok::<(), gifwright::GifError>(())
/// ```
#[derive(Clone)]
pub struct GifFile {
    pub(crate) path: PathBuf,
    pub(crate) decoded: DecodedGif,
}

impl Debug for GifFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GifFile")
            .field("path", &self.path)
            .field("metadata", &self.decoded.metadata)
            .finish_non_exhaustive()
    }
}

impl GifFile {
    /// Validate and decode the GIF at `path`.
    ///
    /// # Errors
    ///
    /// [`GifError::Validation`] if the path fails
    /// [`validate_animated_file`](crate::validation::validate_animated_file),
    /// or [`GifError::GifDecodeError`] if the frames cannot be decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GifError> {
        let path = validation::validate_animated_file(path)?;
        log::debug!("Opening GIF file: {}", path.display());
        let decoded = codec::decode(&path)?;
        Ok(Self { path, decoded })
    }

    /// Wrap an already decoded GIF.
    pub fn from_decoded(path: impl Into<PathBuf>, decoded: DecodedGif) -> Self {
        Self {
            path: path.into(),
            decoded,
        }
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached metadata.
    pub fn metadata(&self) -> &GifMetadata {
        &self.decoded.metadata
    }

    /// The composited frames and their durations.
    pub fn sequence(&self) -> &FrameSequence {
        &self.decoded.sequence
    }

    /// Inspect the file for problems that may affect processing.
    pub fn validate(&self) -> ValidationReport {
        validation::validate_metadata(&self.decoded.metadata)
    }

    /// Resolve `policy` against this file's frames.
    ///
    /// # Errors
    ///
    /// See [`select`](crate::select).
    pub fn select(&self, policy: &SelectionPolicy) -> Result<Vec<usize>, GifError> {
        selection::select(self.decoded.sequence.len(), policy)
    }

    /// Reorder the frames in memory without encoding.
    ///
    /// # Errors
    ///
    /// See [`reorder`](crate::reorder).
    pub fn reordered(&self, policy: &ReorderPolicy) -> Result<FrameSequence, GifError> {
        reorder::reorder(&self.decoded.sequence, policy)
    }

    /// Save the selected frames as still images inside `directory`.
    ///
    /// The directory is created if needed. Files are named
    /// `{prefix}_{index:04}.{ext}` after their zero-based source index, and a
    /// `frames.csv` manifest is written alongside unless disabled.
    ///
    /// # Errors
    ///
    /// Selection errors from [`select`](crate::select),
    /// [`GifError::Validation`] for an unwritable directory or bad quality,
    /// [`GifError::Cancelled`], or any error from saving an image.
    pub fn extract_frames<P: AsRef<Path>>(
        &self,
        directory: P,
        policy: &SelectionPolicy,
        options: &ExtractOptions,
    ) -> Result<ExtractionReport, GifError> {
        extract::extract_frames(self, directory.as_ref(), policy, options)
    }

    /// Like [`extract_frames`](GifFile::extract_frames), but saves frames
    /// on the rayon thread pool.
    ///
    /// # Errors
    ///
    /// See [`extract_frames`](GifFile::extract_frames).
    #[cfg(feature = "rayon")]
    pub fn extract_frames_parallel<P: AsRef<Path>>(
        &self,
        directory: P,
        policy: &SelectionPolicy,
        options: &ExtractOptions,
    ) -> Result<ExtractionReport, GifError> {
        crate::rayon::extract_frames_parallel(self, directory.as_ref(), policy, options)
    }

    /// Reorder the animation with `policy` and encode it to `output`.
    ///
    /// The source loop count is kept unless `options.encode.repeat` is set.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidParameter`] for a bad policy, or for an empty
    /// result when fallback is disabled. Encoding and validation errors are
    /// passed through.
    pub fn reverse<P: AsRef<Path>>(
        &self,
        output: P,
        policy: &ReorderPolicy,
        options: &ReverseOptions,
    ) -> Result<ReverseReport, GifError> {
        reverse::reverse(self, output.as_ref(), policy, options)
    }
}
