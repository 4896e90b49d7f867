//! Ordered frames with their display durations.

use image::RgbaImage;

use crate::error::GifError;

/// Display duration used when a source frame does not carry one.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// An ordered list of frames and a parallel list of display durations in
/// milliseconds.
///
/// The two lists always have the same length. Frames are usually fully
/// composited RGBA canvases, but the type is generic so reordering logic can
/// be exercised with lightweight payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence<F = RgbaImage> {
    frames: Vec<F>,
    durations: Vec<u32>,
}

impl<F> FrameSequence<F> {
    /// Pair frames with durations.
    ///
    /// # Errors
    ///
    /// Returns [`GifError::InvalidParameter`] if the lengths differ.
    pub fn new(frames: Vec<F>, durations: Vec<u32>) -> Result<Self, GifError> {
        if frames.len() != durations.len() {
            return Err(GifError::InvalidParameter(format!(
                "{} frames but {} durations",
                frames.len(),
                durations.len(),
            )));
        }
        Ok(Self { frames, durations })
    }

    /// Give every frame [`DEFAULT_FRAME_DURATION_MS`].
    pub fn with_default_durations(frames: Vec<F>) -> Self {
        let durations = vec![DEFAULT_FRAME_DURATION_MS; frames.len()];
        Self { frames, durations }
    }

    /// An empty sequence.
    pub fn empty() -> Self {
        Self {
            frames: Vec::new(),
            durations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    /// Sum of all durations in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.durations.iter().map(|&d| u64::from(d)).sum()
    }

    /// Iterate over `(frame, duration)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&F, u32)> {
        self.frames.iter().zip(self.durations.iter().copied())
    }

    /// Split back into the frame and duration lists.
    pub fn into_parts(self) -> (Vec<F>, Vec<u32>) {
        (self.frames, self.durations)
    }
}

impl<F: Clone> FrameSequence<F> {
    /// Build a new sequence from the frames at `positions`, in order.
    ///
    /// Positions may repeat. Callers must have checked every position is in
    /// bounds.
    pub(crate) fn gather(&self, positions: &[usize]) -> Self {
        let frames = positions.iter().map(|&i| self.frames[i].clone()).collect();
        let durations = positions.iter().map(|&i| self.durations[i]).collect();
        Self { frames, durations }
    }
}

impl<F> Default for FrameSequence<F> {
    fn default() -> Self {
        Self::empty()
    }
}
