//! # gifwright
//!
//! Take animated GIFs apart and put them back together: pick frames out as
//! still images, play animations backwards or ping-pong, and combine still
//! images into a new GIF.
//!
//! Frames are decoded once into fully composited RGBA canvases with the
//! [`image`](https://crates.io/crates/image) crate and re-encoded with the
//! [`gif`](https://crates.io/crates/gif) crate.
//!
//! ## Quick Start
//!
//! ### Extract Frames
//!
//! ```no_run
//! use gifwright::{ExtractOptions, GifFile, SelectionPolicy};
//!
//! let gif = GifFile::open("input.gif")?;
//! let policy = SelectionPolicy::explicit("1-3,10")?;
//! let report = gif.extract_frames("frames", &policy, &ExtractOptions::new())?;
//! println!("wrote {} frames", report.len());
//! # Ok::<(), gifwright::GifError>(())
//! ```
//!
//! ### Reverse an Animation
//!
//! ```no_run
//! use gifwright::{GifFile, ReorderPolicy, ReverseOptions};
//!
//! let gif = GifFile::open("input.gif")?;
//! gif.reverse("bounce.gif", &ReorderPolicy::ping_pong(1, 1)?, &ReverseOptions::new())?;
//! # Ok::<(), gifwright::GifError>(())
//! ```
//!
//! ### Combine Images
//!
//! ```no_run
//! use gifwright::{CombineOptions, combine_frames};
//!
//! combine_frames("frames/frames.csv", "rebuilt.gif", &CombineOptions::new())?;
//! # Ok::<(), gifwright::GifError>(())
//! ```
//!
//! ### Pure Selection and Reordering
//!
//! The selection and reordering cores work on plain counts and sequences and
//! need no files:
//!
//! ```
//! use gifwright::{FrameSequence, ReorderPolicy, SelectionPolicy, reorder, select};
//!
//! assert_eq!(select(10, &SelectionPolicy::key_frames("first_last")?)?, vec![0, 9]);
//!
//! let sequence = FrameSequence::new(vec![1, 2, 3], vec![10, 20, 30])?;
//! let reversed = reorder(&sequence, &ReorderPolicy::Simple)?;
//! assert_eq!(reversed.durations(), &[30, 20, 10]);
//! # Ok::<(), gifwright::GifError>(())
//! ```
//!
//! ## Features
//!
//! - **Frame selection**: all, explicit 1-based lists (`"1-3,7"`), stepped
//!   ranges, every Nth frame, and key-frame heuristics
//! - **Reordering**: reverse, ping-pong with cycle counts, custom patterns;
//!   per-frame durations travel with their frames
//! - **Manifests**: extraction writes a CSV manifest that combination reads
//! - **Progress & cancellation**: cooperative callbacks and
//!   `CancellationToken` for long-running operations
//! - **Validation**: path checks before work starts and a
//!   `ValidationReport` for opened files
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `extract_frames_parallel()` saves frames on rayon threads |
//! | `full` | Enables all of the above |

pub mod codec;
mod combine;
pub mod configuration;
pub mod error;
mod extract;
mod gif_file;
pub mod manifest;
pub mod metadata;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
pub mod reorder;
mod reverse;
pub mod selection;
pub mod sequence;
pub mod validation;

pub use codec::DecodedGif;
pub use combine::{CombineReport, combine_frames};
pub use configuration::{
    CombineOptions, Disposal, EncodeOptions, ExtractOptions, OutputFormat, ReverseOptions,
};
pub use error::GifError;
pub use extract::ExtractionReport;
pub use gif_file::GifFile;
pub use manifest::{Manifest, ManifestEntry};
pub use metadata::{GifMetadata, LoopCount};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use reorder::{ReorderPolicy, reorder};
pub use reverse::ReverseReport;
pub use selection::{FrameSpec, KeyFrameMethod, SelectionPolicy, select};
pub use sequence::FrameSequence;
pub use validation::{ValidationError, ValidationReport};
