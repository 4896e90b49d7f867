//! GIF metadata types.
//!
//! [`GifMetadata`] is extracted once when a [`GifFile`](crate::GifFile) is
//! opened and cached for its lifetime.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

/// How many times an animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopCount {
    /// Loop forever. This is the default for newly encoded GIFs.
    #[default]
    Infinite,
    /// Repeat `n` times after the first play. `Finite(0)` plays once.
    Finite(u16),
}

impl LoopCount {
    /// Interpret the conventional integer form where `0` means forever.
    pub fn from_count(count: u16) -> Self {
        if count == 0 {
            LoopCount::Infinite
        } else {
            LoopCount::Finite(count)
        }
    }
}

impl From<LoopCount> for gif::Repeat {
    fn from(count: LoopCount) -> Self {
        match count {
            LoopCount::Infinite => gif::Repeat::Infinite,
            LoopCount::Finite(n) => gif::Repeat::Finite(n),
        }
    }
}

impl From<gif::Repeat> for LoopCount {
    fn from(repeat: gif::Repeat) -> Self {
        match repeat {
            gif::Repeat::Infinite => LoopCount::Infinite,
            gif::Repeat::Finite(n) => LoopCount::Finite(n),
        }
    }
}

impl Display for LoopCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LoopCount::Infinite => f.write_str("infinite"),
            LoopCount::Finite(0) => f.write_str("once"),
            LoopCount::Finite(n) => write!(f, "{n} repeats"),
        }
    }
}

/// Metadata for a decoded GIF.
///
/// # Example
///
/// ```no_run
/// use gifwright::GifFile;
///
/// let gif = GifFile::open("input.gif").unwrap();
/// let metadata = gif.metadata();
/// println!("{} frames, {:?} total", metadata.frame_count, metadata.total_duration);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct GifMetadata {
    /// Logical screen width in pixels.
    pub width: u32,
    /// Logical screen height in pixels.
    pub height: u32,
    /// Number of frames.
    pub frame_count: usize,
    /// `true` when the file holds more than one frame.
    pub is_animated: bool,
    /// Loop behaviour declared by the file.
    pub loop_count: LoopCount,
    /// Per-frame display durations in milliseconds.
    pub durations: Vec<u32>,
    /// Sum of all frame durations.
    pub total_duration: Duration,
    /// Size of the encoded file in bytes.
    pub file_size: u64,
}
