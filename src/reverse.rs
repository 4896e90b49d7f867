//! Reordered GIF output.
//!
//! Reversal reorders the decoded frames in memory and hands the new sequence
//! straight to the encoder. When the reordered sequence cannot be encoded
//! (in practice, a ping-pong with zero cycles yields no frames) the original
//! animation is written instead, unless
//! [`ReverseOptions::fallback_to_original`] is off.

use std::path::{Path, PathBuf};

use crate::codec;
use crate::configuration::ReverseOptions;
use crate::error::GifError;
use crate::gif_file::GifFile;
use crate::metadata::LoopCount;
use crate::progress::OperationType;
use crate::reorder::{self, ReorderPolicy};
use crate::sequence::FrameSequence;
use crate::validation;

/// What a reversal wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ReverseReport {
    /// The written GIF.
    pub output_path: PathBuf,
    /// Frames in the source.
    pub input_frame_count: usize,
    /// Frames in the written file.
    pub output_frame_count: usize,
    /// Durations of the written frames in milliseconds.
    pub output_durations: Vec<u32>,
    /// Loop count written to the file.
    pub loop_count: LoopCount,
    /// `false` when the source was written unchanged (a single frame
    /// gathered once, or fallback).
    pub reversed: bool,
    /// `true` when the reordered sequence was unusable and the original
    /// was written instead.
    pub fell_back: bool,
}

impl ReverseReport {
    /// Total playback time of the written frames in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.output_durations.iter().map(|&d| u64::from(d)).sum()
    }
}

pub(crate) fn reverse(
    gif: &GifFile,
    output: &Path,
    policy: &ReorderPolicy,
    options: &ReverseOptions,
) -> Result<ReverseReport, GifError> {
    validation::validate_quality(i64::from(options.encode.quality))?;
    let output = validation::validate_output_path(output, true)?;
    let source = gif.sequence();

    let reordered = reorder::reorder(source, policy)?;
    let (sequence, reversed, fell_back) = if !is_encodable(&reordered) {
        if !options.fallback_to_original {
            return Err(GifError::InvalidParameter(format!(
                "reorder policy {policy} produced no usable frames"
            )));
        }
        // TODO: an empty ping-pong silently becoming a copy of the input
        // is surprising; consider making fallback opt-in.
        log::warn!(
            "Reorder policy {policy} produced no usable frames for {}; writing the original sequence",
            gif.path().display(),
        );
        (source.clone(), false, true)
    } else if source.len() <= 1 && reordered.len() == source.len() {
        log::debug!(
            "{} has a single frame; writing it unchanged",
            gif.path().display()
        );
        (reordered, false, false)
    } else {
        (reordered, true, false)
    };

    let mut encode = options.encode.clone();
    let loop_count = encode.repeat.unwrap_or(gif.metadata().loop_count);
    encode.repeat = Some(loop_count);

    codec::encode_with_control(
        &sequence,
        &output,
        &encode,
        &options.control,
        OperationType::Reversal,
    )?;

    log::debug!(
        "Wrote {} frames ({policy}) to {}",
        sequence.len(),
        output.display(),
    );
    Ok(ReverseReport {
        output_path: output,
        input_frame_count: source.len(),
        output_frame_count: sequence.len(),
        output_durations: sequence.durations().to_vec(),
        loop_count,
        reversed,
        fell_back,
    })
}

/// Non-empty with one shared canvas size within GIF limits.
fn is_encodable(sequence: &FrameSequence) -> bool {
    codec::canvas_dimensions(sequence).is_ok()
}
