//! Input/output validation.
//!
//! Path checks ([`validate_animated_file`], [`validate_output_path`]) run
//! before any decoding or encoding and fail with a [`ValidationError`].
//! [`GifFile::validate`](crate::GifFile::validate) inspects an opened file
//! and returns a [`ValidationReport`] describing anything unusual.
//!
//! # Example
//!
//! ```no_run
//! use gifwright::GifFile;
//!
//! let gif = GifFile::open("input.gif")?;
//! let report = gif.validate();
//! if report.is_valid() {
//!     println!("File is valid");
//! } else {
//!     for error in &report.errors {
//!         println!("Error: {error}");
//!     }
//! }
//! # Ok::<(), gifwright::GifError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec;
use crate::metadata::GifMetadata;

/// File extensions accepted as animated input.
pub const SUPPORTED_ANIMATED_EXTENSIONS: &[&str] = &["gif"];

/// Largest input file accepted, in bytes.
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Frame count above which a file is flagged as unusually long.
pub const MAX_FRAME_COUNT: usize = 1000;

/// Browsers clamp delays below this to roughly 100 ms.
const MIN_RELIABLE_DELAY_MS: u32 = 20;

/// A path or parameter failed validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The input path does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The input path exists but is not a regular file.
    #[error("Path is not a file: {0}")]
    NotAFile(PathBuf),

    /// The input has an extension this tool does not read.
    #[error("Unsupported file format {extension:?} for {path}")]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
        /// Its lowercase extension, empty when there is none.
        extension: String,
    },

    /// The input exceeds [`MAX_FILE_SIZE`].
    #[error("File is too large ({size} bytes, limit {limit} bytes): {path}")]
    FileTooLarge {
        /// Offending path.
        path: PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The input could not be parsed as a GIF.
    #[error("File is not a decodable GIF: {path}: {reason}")]
    NotDecodable {
        /// Offending path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The output location cannot be written.
    #[error("Output directory not writable: {0}")]
    OutputNotWritable(PathBuf),

    /// A quality value was outside 1-100.
    #[error("Quality must be between 1 and 100 (got {0})")]
    InvalidQuality(i64),

    /// An unknown output image format was requested.
    #[error("Unsupported output format: {0}")]
    InvalidOutputFormat(String),
}

/// Check that `path` is an existing, readable GIF within the size limit.
///
/// Only the header is decoded.
///
/// # Errors
///
/// The matching [`ValidationError`] variant for the first failed check.
pub fn validate_animated_file<P: AsRef<Path>>(path: P) -> Result<PathBuf, ValidationError> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|_| ValidationError::FileNotFound(path.into()))?;
    if !metadata.is_file() {
        return Err(ValidationError::NotAFile(path.into()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !SUPPORTED_ANIMATED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedFormat {
            path: path.into(),
            extension,
        });
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(ValidationError::FileTooLarge {
            path: path.into(),
            size: metadata.len(),
            limit: MAX_FILE_SIZE,
        });
    }

    let bytes = fs::read(path).map_err(|e| ValidationError::NotDecodable {
        path: path.into(),
        reason: e.to_string(),
    })?;
    codec::probe(&bytes).map_err(|e| ValidationError::NotDecodable {
        path: path.into(),
        reason: e.to_string(),
    })?;

    Ok(path.to_path_buf())
}

/// Check that a file can be written at `path`.
///
/// With `create_dirs`, missing parent directories are created first.
///
/// # Errors
///
/// [`ValidationError::OutputNotWritable`] if the parent directory is
/// missing, cannot be created, or is read-only.
pub fn validate_output_path<P: AsRef<Path>>(
    path: P,
    create_dirs: bool,
) -> Result<PathBuf, ValidationError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    validate_output_directory(&parent, create_dirs)?;
    Ok(path.to_path_buf())
}

/// Check that files can be written inside `directory`.
///
/// # Errors
///
/// [`ValidationError::OutputNotWritable`] as for [`validate_output_path`].
pub fn validate_output_directory<P: AsRef<Path>>(
    directory: P,
    create_dirs: bool,
) -> Result<PathBuf, ValidationError> {
    let directory = directory.as_ref();
    if create_dirs {
        fs::create_dir_all(directory)
            .map_err(|_| ValidationError::OutputNotWritable(directory.into()))?;
    }
    let metadata = fs::metadata(directory)
        .map_err(|_| ValidationError::OutputNotWritable(directory.into()))?;
    if !metadata.is_dir() || metadata.permissions().readonly() {
        return Err(ValidationError::OutputNotWritable(directory.into()));
    }
    Ok(directory.to_path_buf())
}

/// Check a quality setting and narrow it to `u8`.
///
/// # Errors
///
/// [`ValidationError::InvalidQuality`] outside 1-100.
pub fn validate_quality(quality: i64) -> Result<u8, ValidationError> {
    match u8::try_from(quality) {
        Ok(value @ 1..=100) => Ok(value),
        _ => Err(ValidationError::InvalidQuality(quality)),
    }
}

/// Summary of GIF validation.
///
/// Produced by [`GifFile::validate`](crate::GifFile::validate).
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Non-fatal issues that may affect output quality.
    pub warnings: Vec<String>,
    /// Fatal issues that will prevent processing.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of issues (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run validation checks on decoded metadata.
pub(crate) fn validate_metadata(metadata: &GifMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Canvas ─────────────────────────────────────────────────────
    if metadata.width == 0 || metadata.height == 0 {
        report.errors.push(format!(
            "Invalid canvas dimensions: {}×{}",
            metadata.width, metadata.height,
        ));
    }

    // ── Frames ─────────────────────────────────────────────────────
    if metadata.frame_count == 0 {
        report.errors.push("File contains no frames".to_string());
    } else if !metadata.is_animated {
        report
            .info
            .push("Single-frame GIF: only frame 0 can be selected".to_string());
    }

    if metadata.frame_count > MAX_FRAME_COUNT {
        report.warnings.push(format!(
            "Unusually long animation ({} frames) - processing may be slow",
            metadata.frame_count,
        ));
    }

    let short_frames = metadata
        .durations
        .iter()
        .filter(|&&d| d < MIN_RELIABLE_DELAY_MS)
        .count();
    if short_frames > 0 {
        report.warnings.push(format!(
            "{short_frames} frame(s) shorter than {MIN_RELIABLE_DELAY_MS} ms - many viewers slow these down",
        ));
    }

    report.info.push(format!(
        "GIF: {}×{}, {} frames, {:.2}s, loop {}",
        metadata.width,
        metadata.height,
        metadata.frame_count,
        metadata.total_duration.as_secs_f64(),
        metadata.loop_count,
    ));

    report
}
