//! # Decoration Painting
//!
//! Turns an [`ArrangementResult`] into one background/border rectangle per
//! extent the block touched. The rectangles come from the recorded spans
//! only, so a split block gets a box on each extent sized to exactly what was
//! placed there, and content that moved to another extent is never painted
//! on this one.

use serde::Serialize;

use super::extent::ExtentRef;
use super::ArrangementResult;
use crate::style::{Border, Color, Decoration};

/// A decoration box on one extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationRect {
    pub extent: ExtentRef,
    pub x: f64,
    /// Top edge (the span's start offset).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub background: Option<Color>,
    pub border: Option<Border>,
    /// The block started on an earlier extent.
    pub continued_before: bool,
    /// The block continues on a later extent.
    pub continued_after: bool,
}

/// Paint `decoration` over every span of `result`. Pure: the same input
/// always yields the same rectangles.
pub fn paint(result: &ArrangementResult, decoration: &Decoration) -> Vec<DecorationRect> {
    if decoration.is_empty() {
        return Vec::new();
    }

    let last = result.extents_used.len().saturating_sub(1);
    result
        .extents_used
        .iter()
        .enumerate()
        .map(|(i, span)| DecorationRect {
            extent: span.extent_ref,
            x: result.frame.left,
            y: span.start_offset,
            width: result.frame.width(),
            height: span.height(),
            background: decoration.background,
            border: decoration.border,
            continued_before: i > 0,
            continued_after: i < last,
        })
        .collect()
}
