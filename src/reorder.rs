//! Frame reordering.
//!
//! [`ReorderPolicy`] describes how to rearrange an animation (plain reversal,
//! ping-pong, or an explicit pattern) and [`reorder`] applies it to a
//! [`FrameSequence`]. Every policy is resolved to a list of source positions
//! first ([`ReorderPolicy::plan`]), then frames and durations are gathered at
//! those positions, so each output frame keeps its original duration.
//!
//! # Example
//!
//! ```
//! use gifwright::{FrameSequence, ReorderPolicy, reorder};
//!
//! let sequence = FrameSequence::new(vec!['A', 'B'], vec![40, 80])?;
//! let bounced = reorder(&sequence, &ReorderPolicy::ping_pong(1, 1)?)?;
//! assert_eq!(bounced.frames(), &['A', 'B', 'B', 'A']);
//! assert_eq!(bounced.durations(), &[40, 80, 80, 40]);
//! # Ok::<(), gifwright::GifError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::GifError;
use crate::sequence::FrameSequence;

/// Upper bound on the number of positions a policy may resolve to.
pub const MAX_PLAN_LEN: usize = 1 << 24;

/// How to rearrange the frames of an animation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub enum ReorderPolicy {
    /// Play the animation backwards.
    #[default]
    Simple,
    /// Forward pass repeated `forward_cycles` times, then the reversed pass
    /// repeated `reverse_cycles` times. A count of zero omits that pass.
    PingPong {
        forward_cycles: u32,
        reverse_cycles: u32,
    },
    /// Zero-based source positions in output order. Repeats are allowed.
    Custom(Vec<usize>),
}

impl ReorderPolicy {
    /// A ping-pong policy.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidParameter`] if either count is negative or does
    /// not fit in a `u32`.
    pub fn ping_pong(forward_cycles: i64, reverse_cycles: i64) -> Result<Self, GifError> {
        let check = |count: i64, label: &str| {
            u32::try_from(count).map_err(|_| {
                GifError::InvalidParameter(format!(
                    "{label} cycles must be between 0 and {} (got {count})",
                    u32::MAX
                ))
            })
        };
        Ok(ReorderPolicy::PingPong {
            forward_cycles: check(forward_cycles, "forward")?,
            reverse_cycles: check(reverse_cycles, "reverse")?,
        })
    }

    /// Parse a custom pattern such as `"0,1,2,1,0"`.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidParameter`] if the pattern is empty or contains
    /// anything other than non-negative integers.
    pub fn custom_from_str(pattern: &str) -> Result<Self, GifError> {
        let positions = pattern
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<usize>().map_err(|_| {
                    GifError::InvalidParameter(format!(
                        "pattern entry {part:?} is not a frame position"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if positions.is_empty() {
            return Err(GifError::InvalidParameter(
                "custom pattern is empty".to_string(),
            ));
        }
        Ok(ReorderPolicy::Custom(positions))
    }

    /// Resolve the policy into source positions for a sequence of `len`
    /// frames.
    ///
    /// # Errors
    ///
    /// [`GifError::InvalidParameter`] if a custom pattern is empty or refers
    /// to a position outside `[0, len)`, or if a ping-pong would exceed
    /// [`MAX_PLAN_LEN`] positions.
    pub fn plan(&self, len: usize) -> Result<Vec<usize>, GifError> {
        match self {
            ReorderPolicy::Simple => Ok((0..len).rev().collect()),
            &ReorderPolicy::PingPong {
                forward_cycles,
                reverse_cycles,
            } => {
                let total = (forward_cycles as usize)
                    .checked_add(reverse_cycles as usize)
                    .and_then(|cycles| cycles.checked_mul(len))
                    .filter(|&total| total <= MAX_PLAN_LEN)
                    .ok_or_else(|| {
                        GifError::InvalidParameter(format!(
                            "ping-pong of {len} frames with {forward_cycles}+{reverse_cycles} cycles exceeds {MAX_PLAN_LEN} frames"
                        ))
                    })?;
                if total == 0 {
                    return Ok(Vec::new());
                }
                let mut plan = Vec::with_capacity(total);
                for _ in 0..forward_cycles {
                    plan.extend(0..len);
                }
                for _ in 0..reverse_cycles {
                    plan.extend((0..len).rev());
                }
                Ok(plan)
            }
            ReorderPolicy::Custom(positions) => {
                if positions.is_empty() {
                    return Err(GifError::InvalidParameter(
                        "custom pattern is empty".to_string(),
                    ));
                }
                if let Some(&bad) = positions.iter().find(|&&position| position >= len) {
                    return Err(GifError::InvalidParameter(format!(
                        "pattern position {bad} is out of range (sequence has {len} frames)"
                    )));
                }
                Ok(positions.clone())
            }
        }
    }
}

impl Display for ReorderPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ReorderPolicy::Simple => f.write_str("reverse"),
            ReorderPolicy::PingPong {
                forward_cycles,
                reverse_cycles,
            } => write!(f, "ping-pong ({forward_cycles} forward, {reverse_cycles} reverse)"),
            ReorderPolicy::Custom(positions) => {
                let joined: Vec<String> = positions.iter().map(ToString::to_string).collect();
                write!(f, "custom [{}]", joined.join(","))
            }
        }
    }
}

/// Apply `policy` to `sequence`, returning a new sequence.
///
/// Durations travel with their frames. A ping-pong with both cycle counts
/// at zero returns an empty sequence; the caller decides whether that is an
/// error.
///
/// # Errors
///
/// [`GifError::InvalidParameter`] from [`ReorderPolicy::plan`].
pub fn reorder<F: Clone>(
    sequence: &FrameSequence<F>,
    policy: &ReorderPolicy,
) -> Result<FrameSequence<F>, GifError> {
    let plan = policy.plan(sequence.len())?;
    if plan.is_empty() && !sequence.is_empty() {
        log::warn!("Reorder policy {policy} produced an empty sequence");
    }
    log::debug!(
        "Reordering {} frames into {} ({policy})",
        sequence.len(),
        plan.len(),
    );
    Ok(sequence.gather(&plan))
}
