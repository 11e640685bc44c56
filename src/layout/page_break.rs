//! # Arrangement Decisions
//!
//! The rules that decide what happens to a block at the current cursor:
//! keep it here, move it whole to a fresh extent, split it, or (inside a
//! bounded container) cut it off. The decision is made from a trial
//! measurement only; nothing has been emitted when these functions run.

use super::extent::ExtentKind;
use super::fit::FitReport;

/// What to do with a block (or the remainder of one) at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Everything fits: place the whole block on the current extent.
    Keep,
    /// Emit nothing here; retry on a fresh extent.
    Advance,
    /// Place the leading segment that fits, continue the rest on a fresh extent.
    Split,
    /// Place what fits, then stop for good. Bounded containers only.
    Truncate,
}

/// Decide how to arrange a block given a trial measurement at the cursor.
///
/// An unbreakable block below the top of an extent advances rather than
/// split; at the top there is no better extent to wait for, so it splits.
/// A breakable block advances when not even its first line (caption
/// included) would land here, so a caption is never stranded alone.
pub fn decide(report: &FitReport, breakable: bool, at_top: bool, kind: &ExtentKind) -> BreakDecision {
    if report.fits_fully {
        return BreakDecision::Keep;
    }

    let decision = if !breakable {
        if at_top {
            BreakDecision::Split
        } else {
            BreakDecision::Advance
        }
    } else if report.first_segment_height <= 0.0 && !at_top {
        BreakDecision::Advance
    } else {
        BreakDecision::Split
    };

    match (decision, kind) {
        (BreakDecision::Split, ExtentKind::BoundedContainer { .. }) => BreakDecision::Truncate,
        _ => decision,
    }
}

/// Decide what to do when the extent has no room left at all.
pub fn decide_exhausted(kind: &ExtentKind) -> BreakDecision {
    match kind {
        ExtentKind::Page => BreakDecision::Advance,
        ExtentKind::BoundedContainer { .. } => BreakDecision::Truncate,
    }
}
