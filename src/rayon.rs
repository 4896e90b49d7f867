//! Parallel frame extraction.
//!
//! Frames are already decoded by the time extraction starts, so only the
//! image encoding and file writes are spread across [`rayon`] threads. The
//! public API is exposed through
//! [`GifFile::extract_frames_parallel`](crate::GifFile::extract_frames_parallel).

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::codec;
use crate::configuration::ExtractOptions;
use crate::error::GifError;
use crate::extract::{self, ExtractionReport};
use crate::gif_file::GifFile;
use crate::progress::{OperationType, ProgressTracker};
use crate::selection::SelectionPolicy;

pub(crate) fn extract_frames_parallel(
    gif: &GifFile,
    directory: &Path,
    policy: &SelectionPolicy,
    options: &ExtractOptions,
) -> Result<ExtractionReport, GifError> {
    let indices = extract::prepare(gif, directory, policy, options)?;
    let frames = gif.sequence().frames();

    let tracker = Mutex::new(ProgressTracker::new(
        &options.control,
        OperationType::FrameExtraction,
        Some(indices.len() as u64),
    ));

    // `collect` keeps input order, so paths stay parallel to `indices`.
    let paths: Vec<PathBuf> = indices
        .par_iter()
        .map(|&index| {
            if options.control.is_cancelled() {
                return Err(GifError::Cancelled);
            }
            let path = options.frame_path(directory, index);
            codec::save_frame(&frames[index], &path, options.format, options.quality)?;
            if let Ok(mut tracker) = tracker.lock() {
                tracker.advance(Some(index));
            }
            Ok(path)
        })
        .collect::<Result<_, GifError>>()?;

    if let Ok(mut tracker) = tracker.into_inner() {
        tracker.finish();
    }

    extract::finish(gif, directory, indices, paths, options)
}
