//! Building an animated GIF from a manifest of still images.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};

use crate::codec;
use crate::configuration::CombineOptions;
use crate::error::GifError;
use crate::manifest::Manifest;
use crate::progress::OperationType;
use crate::sequence::FrameSequence;
use crate::validation::{self, ValidationError};

/// What a combination wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct CombineReport {
    /// The written GIF.
    pub output_path: PathBuf,
    /// Frames written, one per manifest row.
    pub frame_count: usize,
    /// Canvas width, taken from the first frame.
    pub width: u32,
    /// Canvas height, taken from the first frame.
    pub height: u32,
    /// How many frames had to be resized to the canvas.
    pub resized_frames: usize,
    /// Durations of the written frames in milliseconds.
    pub durations: Vec<u32>,
}

/// Combine the images listed in the manifest at `manifest_path` into an
/// animated GIF at `output`.
///
/// Frames play in manifest order. The first image fixes the canvas size;
/// later images of a different size are resized with a Lanczos3 filter.
/// Rows without a `duration_ms` use [`CombineOptions::frame_duration`].
///
/// # Errors
///
/// - [`GifError::Manifest`] if the manifest is unreadable, malformed, or
///   lists no frames.
/// - [`GifError::Validation`] if a listed image is missing or the output
///   location is not writable.
/// - [`GifError::ImageError`] if an image cannot be decoded.
/// - [`GifError::Cancelled`] or encoder errors.
///
/// # Example
///
/// ```no_run
/// use gifwright::{CombineOptions, combine_frames};
///
/// let report = combine_frames("frames/frames.csv", "out.gif", &CombineOptions::new())?;
/// println!("{} frames", report.frame_count);
/// # Ok::<(), gifwright::GifError>(())
/// ```
pub fn combine_frames<P: AsRef<Path>, Q: AsRef<Path>>(
    manifest_path: P,
    output: Q,
    options: &CombineOptions,
) -> Result<CombineReport, GifError> {
    let manifest_path = manifest_path.as_ref();
    validation::validate_quality(i64::from(options.encode.quality))?;

    let manifest = Manifest::read(manifest_path)?;
    if manifest.is_empty() {
        return Err(GifError::Manifest {
            path: manifest_path.to_path_buf(),
            line: 0,
            reason: "manifest lists no frames".to_string(),
        });
    }
    let output = validation::validate_output_path(output, true)?;

    let mut frames = Vec::with_capacity(manifest.len());
    let mut durations = Vec::with_capacity(manifest.len());
    let mut canvas = None;
    let mut resized_frames = 0;

    for entry in &manifest.entries {
        if options.control.is_cancelled() {
            return Err(GifError::Cancelled);
        }
        if !entry.path.is_file() {
            return Err(ValidationError::FileNotFound(entry.path.clone()).into());
        }

        let image = image::open(&entry.path)?.to_rgba8();
        let (width, height) = *canvas.get_or_insert(image.dimensions());
        let image = if image.dimensions() == (width, height) {
            image
        } else {
            log::debug!(
                "Resizing {} from {}x{} to {width}x{height}",
                entry.path.display(),
                image.width(),
                image.height(),
            );
            resized_frames += 1;
            imageops::resize(&image, width, height, FilterType::Lanczos3)
        };

        frames.push(image);
        durations.push(entry.duration_ms.unwrap_or(options.frame_duration));
    }

    let (width, height) = canvas.unwrap_or_default();
    let sequence = FrameSequence::new(frames, durations)?;
    codec::encode_with_control(
        &sequence,
        &output,
        &options.encode,
        &options.control,
        OperationType::Combination,
    )?;

    log::debug!(
        "Combined {} frames from {} into {}",
        sequence.len(),
        manifest_path.display(),
        output.display(),
    );
    Ok(CombineReport {
        output_path: output,
        frame_count: sequence.len(),
        width,
        height,
        resized_frames,
        durations: sequence.durations().to_vec(),
    })
}
