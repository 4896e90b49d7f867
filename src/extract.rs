//! Frame extraction to still images.

use std::path::{Path, PathBuf};

use crate::codec;
use crate::configuration::ExtractOptions;
use crate::error::GifError;
use crate::gif_file::GifFile;
use crate::manifest::{MANIFEST_FILE_NAME, Manifest, ManifestEntry};
use crate::progress::{OperationType, ProgressTracker};
use crate::selection::{self, SelectionPolicy};
use crate::validation;

/// What an extraction wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ExtractionReport {
    /// Zero-based source indices, ascending.
    pub indices: Vec<usize>,
    /// Saved image files, parallel to `indices`.
    pub paths: Vec<PathBuf>,
    /// The manifest, when one was written.
    pub manifest_path: Option<PathBuf>,
}

impl ExtractionReport {
    /// Number of frames written.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Checks shared by the sequential and parallel paths. Returns the
/// selected indices once the output directory is ready.
pub(crate) fn prepare(
    gif: &GifFile,
    directory: &Path,
    policy: &SelectionPolicy,
    options: &ExtractOptions,
) -> Result<Vec<usize>, GifError> {
    validation::validate_quality(i64::from(options.quality))?;
    let indices = selection::select(gif.sequence().len(), policy)?;
    validation::validate_output_directory(directory, true)?;
    log::debug!(
        "Extracting {} frames from {} to {} as {}",
        indices.len(),
        gif.path().display(),
        directory.display(),
        options.format,
    );
    Ok(indices)
}

pub(crate) fn extract_frames(
    gif: &GifFile,
    directory: &Path,
    policy: &SelectionPolicy,
    options: &ExtractOptions,
) -> Result<ExtractionReport, GifError> {
    let indices = prepare(gif, directory, policy, options)?;
    let frames = gif.sequence().frames();

    let mut tracker = ProgressTracker::new(
        &options.control,
        OperationType::FrameExtraction,
        Some(indices.len() as u64),
    );
    let mut paths = Vec::with_capacity(indices.len());
    for &index in &indices {
        tracker.check_cancelled()?;
        let path = options.frame_path(directory, index);
        codec::save_frame(&frames[index], &path, options.format, options.quality)?;
        paths.push(path);
        tracker.advance(Some(index));
    }
    tracker.finish();

    finish(gif, directory, indices, paths, options)
}

/// Write the manifest if requested and assemble the report.
pub(crate) fn finish(
    gif: &GifFile,
    directory: &Path,
    indices: Vec<usize>,
    paths: Vec<PathBuf>,
    options: &ExtractOptions,
) -> Result<ExtractionReport, GifError> {
    let manifest_path = if options.write_manifest {
        let durations = gif.sequence().durations();
        let manifest = Manifest::new(
            indices
                .iter()
                .zip(&paths)
                .map(|(&index, path)| ManifestEntry {
                    index: Some(index),
                    path: path.clone(),
                    duration_ms: Some(durations[index]),
                })
                .collect(),
        );
        let manifest_path = directory.join(MANIFEST_FILE_NAME);
        manifest.write(&manifest_path)?;
        Some(manifest_path)
    } else {
        None
    };

    log::debug!("Extracted {} frames to {}", paths.len(), directory.display());
    Ok(ExtractionReport {
        indices,
        paths,
        manifest_path,
    })
}
