//! Operation configuration.
//!
//! The option structs in this module ([`ExtractOptions`], [`ReverseOptions`],
//! [`CombineOptions`], and the shared [`EncodeOptions`]) are builders that
//! thread output settings, progress callbacks, and cancellation tokens
//! through the operations without polluting every function signature. All
//! defaults are explicit fields; there are no module-level settings.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gifwright::{
//!     CancellationToken, ExtractOptions, OutputFormat, ProgressCallback, ProgressInfo,
//! };
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = ExtractOptions::new()
//!     .with_format(OutputFormat::Jpeg)
//!     .with_quality(90)
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone())
//!     .with_batch_size(10);
//! ```

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::metadata::LoopCount;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};
use crate::sequence::DEFAULT_FRAME_DURATION_MS;
use crate::validation::ValidationError;

/// Default quality for re-encoded GIFs.
pub const DEFAULT_GIF_QUALITY: u8 = 85;

/// Default quality for extracted still images.
pub const DEFAULT_IMAGE_QUALITY: u8 = 95;

/// Default directory the CLI writes extracted frames into.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "frames_output";

/// Image format for extracted frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Lossless PNG. This is the default.
    #[default]
    Png,
    /// Lossy JPEG. Alpha is dropped.
    Jpeg,
    /// Windows bitmap.
    Bmp,
    /// TIFF.
    Tiff,
    /// Lossless WebP.
    WebP,
    /// Single-frame GIF.
    Gif,
}

impl OutputFormat {
    /// File extension written for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::WebP => "webp",
            OutputFormat::Gif => "gif",
        }
    }

    /// Map to the corresponding `image` crate format.
    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
            OutputFormat::Tiff => image::ImageFormat::Tiff,
            OutputFormat::WebP => image::ImageFormat::WebP,
            OutputFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "bmp" => Ok(OutputFormat::Bmp),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            "webp" => Ok(OutputFormat::WebP),
            "gif" => Ok(OutputFormat::Gif),
            _ => Err(ValidationError::InvalidOutputFormat(value.to_string())),
        }
    }
}

/// How the decoder should treat a frame's area before drawing the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposal {
    /// Leave the frame in place.
    Keep,
    /// Clear to the background. This is the default; re-encoded frames are
    /// full canvases, so clearing avoids smearing through transparency.
    #[default]
    Background,
    /// Restore what was there before the frame.
    Previous,
}

impl Disposal {
    pub(crate) fn to_gif(self) -> gif::DisposalMethod {
        match self {
            Disposal::Keep => gif::DisposalMethod::Keep,
            Disposal::Background => gif::DisposalMethod::Background,
            Disposal::Previous => gif::DisposalMethod::Previous,
        }
    }
}

/// GIF encoder settings shared by reversal and combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Output quality, 1 (fastest, coarsest palette) to 100.
    pub quality: u8,
    /// Loop behaviour. `None` keeps the source's loop count where there is
    /// one, and loops forever otherwise.
    pub repeat: Option<LoopCount>,
    /// Disposal method written for every frame.
    pub disposal: Disposal,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_GIF_QUALITY,
            repeat: None,
            disposal: Disposal::default(),
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: LoopCount) -> Self {
        self.repeat = Some(repeat);
        self
    }

    #[must_use]
    pub fn with_disposal(mut self, disposal: Disposal) -> Self {
        self.disposal = disposal;
        self
    }

    /// NeuQuant sampling speed for the `gif` quantiser: quality 100 maps to
    /// 1 (slowest, best), quality 1 maps to 30.
    pub(crate) fn quantizer_speed(&self) -> i32 {
        let quality = i32::from(self.quality.clamp(1, 100));
        30 - (quality - 1) * 29 / 99
    }
}

/// Progress and cancellation settings carried by every operation.
#[derive(Clone)]
pub(crate) struct OperationControl {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N frames).
    pub(crate) batch_size: u64,
}

impl Default for OperationControl {
    fn default() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }
}

impl OperationControl {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

/// Implements the progress/cancellation builder methods for an options
/// struct with a `control: OperationControl` field.
macro_rules! operation_control_builders {
    ($options:ident) => {
        impl $options {
            /// Attach a progress callback, invoked every
            /// [`batch_size`](Self::with_batch_size) frames.
            #[must_use]
            pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
                self.control.progress = callback;
                self
            }

            /// Attach a cancellation token. Once cancelled, the operation
            /// stops before its next frame and returns
            /// [`GifError::Cancelled`](crate::GifError::Cancelled).
            #[must_use]
            pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
                self.control.cancellation = Some(token);
                self
            }

            /// Set how often the progress callback fires. Clamped to a
            /// minimum of 1.
            #[must_use]
            pub fn with_batch_size(mut self, size: u64) -> Self {
                self.control.batch_size = size.max(1);
                self
            }
        }
    };
}

/// Settings for [`GifFile::extract_frames`](crate::GifFile::extract_frames).
#[derive(Clone)]
pub struct ExtractOptions {
    /// Image format of the extracted files.
    pub format: OutputFormat,
    /// Quality for lossy formats (1-100).
    pub quality: u8,
    /// File name prefix; files are named `{prefix}_{index:04}.{ext}`.
    pub prefix: String,
    /// Write a `frames.csv` manifest next to the images.
    pub write_manifest: bool,
    pub(crate) control: OperationControl,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("format", &self.format)
            .field("quality", &self.quality)
            .field("prefix", &self.prefix)
            .field("write_manifest", &self.write_manifest)
            .field("has_cancellation", &self.control.cancellation.is_some())
            .field("batch_size", &self.control.batch_size)
            .finish()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Defaults: PNG, quality 95, prefix `frame`, manifest on, no progress,
    /// no cancellation, batch size 1.
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: DEFAULT_IMAGE_QUALITY,
            prefix: "frame".to_string(),
            write_manifest: true,
            control: OperationControl::default(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_manifest(mut self, write_manifest: bool) -> Self {
        self.write_manifest = write_manifest;
        self
    }

    /// Output path for the frame at `index` inside `directory`.
    pub fn frame_path(&self, directory: &std::path::Path, index: usize) -> PathBuf {
        directory.join(format!(
            "{}_{index:04}.{}",
            self.prefix,
            self.format.extension()
        ))
    }
}

operation_control_builders!(ExtractOptions);

/// Settings for [`GifFile::reverse`](crate::GifFile::reverse).
#[derive(Clone)]
pub struct ReverseOptions {
    /// Encoder settings for the output GIF.
    pub encode: EncodeOptions,
    /// When the reordered sequence cannot be re-encoded (for example a
    /// ping-pong with zero cycles), encode the original sequence instead of
    /// failing. Defaults to `true`.
    pub fallback_to_original: bool,
    pub(crate) control: OperationControl,
}

impl Debug for ReverseOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ReverseOptions")
            .field("encode", &self.encode)
            .field("fallback_to_original", &self.fallback_to_original)
            .field("has_cancellation", &self.control.cancellation.is_some())
            .field("batch_size", &self.control.batch_size)
            .finish()
    }
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseOptions {
    pub fn new() -> Self {
        Self {
            encode: EncodeOptions::default(),
            fallback_to_original: true,
            control: OperationControl::default(),
        }
    }

    #[must_use]
    pub fn with_encode(mut self, encode: EncodeOptions) -> Self {
        self.encode = encode;
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.encode.quality = quality;
        self
    }

    #[must_use]
    pub fn with_fallback_to_original(mut self, fallback: bool) -> Self {
        self.fallback_to_original = fallback;
        self
    }
}

operation_control_builders!(ReverseOptions);

/// Settings for [`combine_frames`](crate::combine_frames).
#[derive(Clone)]
pub struct CombineOptions {
    /// Encoder settings for the output GIF.
    pub encode: EncodeOptions,
    /// Duration for manifest rows without a `duration_ms` value.
    pub frame_duration: u32,
    pub(crate) control: OperationControl,
}

impl Debug for CombineOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CombineOptions")
            .field("encode", &self.encode)
            .field("frame_duration", &self.frame_duration)
            .field("has_cancellation", &self.control.cancellation.is_some())
            .field("batch_size", &self.control.batch_size)
            .finish()
    }
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CombineOptions {
    pub fn new() -> Self {
        Self {
            encode: EncodeOptions::default(),
            frame_duration: DEFAULT_FRAME_DURATION_MS,
            control: OperationControl::default(),
        }
    }

    #[must_use]
    pub fn with_encode(mut self, encode: EncodeOptions) -> Self {
        self.encode = encode;
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.encode.quality = quality;
        self
    }

    /// Set the fallback frame duration in milliseconds. Clamped to a
    /// minimum of 10 ms, the shortest delay a GIF can express.
    #[must_use]
    pub fn with_frame_duration(mut self, duration_ms: u32) -> Self {
        self.frame_duration = duration_ms.max(10);
        self
    }
}

operation_control_builders!(CombineOptions);
