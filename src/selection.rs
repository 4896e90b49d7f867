//! Frame selection.
//!
//! This module provides [`SelectionPolicy`] for describing which frames of an
//! animation to keep, and [`select`] for turning a policy into concrete
//! zero-based frame indices. Every policy yields indices in ascending order
//! with duplicates removed.
//!
//! # Example
//!
//! ```
//! use gifwright::{SelectionPolicy, select};
//!
//! let policy = SelectionPolicy::explicit("1-3,7")?;
//! assert_eq!(select(10, &policy)?, vec![0, 1, 2, 6]);
//!
//! let policy = SelectionPolicy::range(2, 8, 3)?;
//! assert_eq!(select(10, &policy)?, vec![2, 5]);
//! # Ok::<(), gifwright::GifError>(())
//! ```

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::GifError;

/// Heuristic used by [`SelectionPolicy::KeyFrames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFrameMethod {
    /// First, middle, and last frame.
    FirstLastMiddle,
    /// First and last frame.
    FirstLast,
    /// The middle frame only.
    Middle,
    /// First frame, the three quarter points, and the last frame.
    QuarterPoints,
}

impl KeyFrameMethod {
    /// Every supported method, in the order they are listed to users.
    pub const ALL: [KeyFrameMethod; 4] = [
        KeyFrameMethod::FirstLastMiddle,
        KeyFrameMethod::FirstLast,
        KeyFrameMethod::Middle,
        KeyFrameMethod::QuarterPoints,
    ];

    /// The textual name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            KeyFrameMethod::FirstLastMiddle => "first_last_middle",
            KeyFrameMethod::FirstLast => "first_last",
            KeyFrameMethod::Middle => "middle",
            KeyFrameMethod::QuarterPoints => "quarter_points",
        }
    }

    fn indices(self, frame_count: usize) -> Vec<usize> {
        let last = frame_count - 1;
        let middle = frame_count / 2;
        match self {
            KeyFrameMethod::FirstLastMiddle => match frame_count {
                1 => vec![0],
                2 => vec![0, 1],
                _ => vec![0, middle, last],
            },
            KeyFrameMethod::FirstLast => vec![0, last],
            KeyFrameMethod::Middle => vec![middle],
            KeyFrameMethod::QuarterPoints => {
                if frame_count < 4 {
                    (0..frame_count).collect()
                } else {
                    let quarter = frame_count / 4;
                    vec![0, quarter, quarter * 2, quarter * 3, last]
                }
            }
        }
    }
}

impl Display for KeyFrameMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for KeyFrameMethod {
    type Err = GifError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        KeyFrameMethod::ALL
            .into_iter()
            .find(|method| method.name() == normalized)
            .ok_or_else(|| {
                GifError::InvalidSelection(format!("unknown key frame method: {value:?}"))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecToken {
    Single(i64),
    Span(i64, i64),
}

/// A parsed list of 1-based frame numbers and inclusive ranges, such as
/// `"1,3,5-8"`.
///
/// Parsing only checks syntax; bounds are checked against the source frame
/// count by [`select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    text: String,
    tokens: Vec<SpecToken>,
}

impl FrameSpec {
    /// The text this spec was parsed from.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn indices(&self, frame_count: usize) -> Result<BTreeSet<usize>, GifError> {
        let mut indices = BTreeSet::new();
        for token in &self.tokens {
            let (first, last) = match *token {
                SpecToken::Single(number) => (number, number),
                SpecToken::Span(first, last) => (first, last),
            };
            if first < 1 {
                return Err(GifError::InvalidSelection(format!(
                    "frame {first} is out of range (frames are numbered from 1)"
                )));
            }
            if last > frame_count as i64 {
                return Err(out_of_range(
                    frame_count,
                    format!("frame {last} is out of range (source has {frame_count} frames)"),
                ));
            }
            indices.extend((first as usize - 1)..(last as usize));
        }
        Ok(indices)
    }
}

impl Display for FrameSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.text)
    }
}

impl FromStr for FrameSpec {
    type Err = GifError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parse_number = |part: &str, token: &str| {
            part.trim().parse::<i64>().map_err(|_| {
                GifError::InvalidSelection(format!("cannot parse {token:?} as a frame number"))
            })
        };

        let mut tokens = Vec::new();
        for raw in text.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                return Err(GifError::InvalidSelection(format!(
                    "empty entry in frame list {text:?}"
                )));
            }
            match token.split_once('-') {
                Some((first, last)) => {
                    let first = parse_number(first, token)?;
                    let last = parse_number(last, token)?;
                    if last < first {
                        return Err(GifError::InvalidSelection(format!(
                            "range {token:?} ends before it starts"
                        )));
                    }
                    tokens.push(SpecToken::Span(first, last));
                }
                None => tokens.push(SpecToken::Single(parse_number(token, token)?)),
            }
        }

        Ok(Self {
            text: text.trim().to_string(),
            tokens,
        })
    }
}

/// Specifies which frames to keep from an animation.
///
/// Build validated policies with the associated constructors
/// ([`explicit`](SelectionPolicy::explicit), [`range`](SelectionPolicy::range),
/// [`every_nth`](SelectionPolicy::every_nth),
/// [`key_frames`](SelectionPolicy::key_frames)); [`select`] re-checks the
/// variant fields, so hand-built values are safe too.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub enum SelectionPolicy {
    /// Every frame.
    #[default]
    All,
    /// 1-based frame numbers and inclusive ranges, e.g. `"1-3,7"`.
    Explicit(FrameSpec),
    /// Zero-based `[start, end)` stepped by `step`.
    Range {
        /// First index (inclusive).
        start: usize,
        /// Last index (exclusive).
        end: usize,
        /// Distance between selected indices.
        step: usize,
    },
    /// Every Nth frame starting at frame 0.
    EveryNth(usize),
    /// A fixed set of representative frames.
    KeyFrames(KeyFrameMethod),
}

impl SelectionPolicy {
    /// Parse a comma-separated list of 1-based frame numbers and ranges.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidSelection`] if a token is not an integer or an
    /// `a-b` range with `a <= b`.
    pub fn explicit(text: &str) -> Result<Self, GifError> {
        Ok(SelectionPolicy::Explicit(text.parse()?))
    }

    /// A zero-based `[start, end)` range stepped by `step`.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidSelection`] if `start < 0`, `start >= end`, or
    /// `step <= 0`. The upper bound is checked by [`select`].
    pub fn range(start: i64, end: i64, step: i64) -> Result<Self, GifError> {
        if start < 0 {
            return Err(GifError::InvalidSelection(format!(
                "range start {start} is negative"
            )));
        }
        if start >= end {
            return Err(GifError::InvalidSelection(format!(
                "range start {start} must be less than end {end}"
            )));
        }
        if step <= 0 {
            return Err(GifError::InvalidSelection(format!(
                "range step must be positive (got {step})"
            )));
        }
        Ok(SelectionPolicy::Range {
            start: start as usize,
            end: end as usize,
            step: step as usize,
        })
    }

    /// Every `n`th frame.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidSelection`] if `n <= 0`.
    pub fn every_nth(n: i64) -> Result<Self, GifError> {
        if n <= 0 {
            return Err(GifError::InvalidSelection(format!(
                "interval must be positive (got {n})"
            )));
        }
        Ok(SelectionPolicy::EveryNth(n as usize))
    }

    /// Key frames chosen by the named method.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidSelection`] for an unknown method name.
    pub fn key_frames(method: &str) -> Result<Self, GifError> {
        Ok(SelectionPolicy::KeyFrames(method.parse()?))
    }

    /// Short name of the policy kind, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            SelectionPolicy::All => "all",
            SelectionPolicy::Explicit(_) => "explicit",
            SelectionPolicy::Range { .. } => "range",
            SelectionPolicy::EveryNth(_) => "every_nth",
            SelectionPolicy::KeyFrames(_) => "key_frames",
        }
    }
}

/// Resolve a selection policy against a source with `frame_count` frames.
///
/// Returns zero-based indices in ascending order without duplicates.
///
/// A single-frame source accepts any policy that resolves to exactly
/// `[0]`; a policy that asks for a later frame fails with
/// [`GifError::UnsupportedOperation`].
///
/// # Errors
///
/// - [`GifError::InvalidSelection`] for malformed or out-of-range
///   selections, or when the source has no frames.
/// - [`GifError::UnsupportedOperation`] as described above.
pub fn select(frame_count: usize, policy: &SelectionPolicy) -> Result<Vec<usize>, GifError> {
    if frame_count == 0 {
        return Err(GifError::InvalidSelection(
            "source contains no frames".to_string(),
        ));
    }

    let indices: Vec<usize> = match policy {
        SelectionPolicy::All => (0..frame_count).collect(),
        SelectionPolicy::Explicit(spec) => spec.indices(frame_count)?.into_iter().collect(),
        &SelectionPolicy::Range { start, end, step } => {
            if start >= end {
                return Err(GifError::InvalidSelection(format!(
                    "range start {start} must be less than end {end}"
                )));
            }
            if step == 0 {
                return Err(GifError::InvalidSelection(
                    "range step must be positive".to_string(),
                ));
            }
            if end > frame_count {
                return Err(out_of_range(
                    frame_count,
                    format!("range end {end} exceeds frame count {frame_count}"),
                ));
            }
            (start..end).step_by(step).collect()
        }
        &SelectionPolicy::EveryNth(n) => {
            if n == 0 {
                return Err(GifError::InvalidSelection(
                    "interval must be positive".to_string(),
                ));
            }
            (0..frame_count).step_by(n).collect()
        }
        SelectionPolicy::KeyFrames(method) => {
            let mut indices = method.indices(frame_count);
            indices.sort_unstable();
            indices.dedup();
            indices
        }
    };

    log::debug!(
        "Selected {} of {} frames ({} policy)",
        indices.len(),
        frame_count,
        policy.kind(),
    );
    Ok(indices)
}

/// A request past the last frame is unsupported on a still image and
/// invalid everywhere else.
fn out_of_range(frame_count: usize, message: String) -> GifError {
    if frame_count == 1 {
        GifError::UnsupportedOperation(format!("{message}; a still image only has frame 0"))
    } else {
        GifError::InvalidSelection(message)
    }
}
