//! # Fit Estimation
//!
//! A trial layout pass: walk a block (or the remainder of one) the way the
//! emitter would, using the same line breaks and the same atomicity rules,
//! and report how much of it lands on the current extent. Nothing is
//! emitted and no cursor moves; the engine takes its KEEP / ADVANCE / SPLIT
//! decision from this report before committing anything.

use super::extent::{Frame, FIT_EPSILON};
use super::{BlockView, LayoutEngine};
use crate::model::{Block, Fragment};

/// Result of a trial layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    /// The whole block would be placed on the current extent.
    pub fits_fully: bool,
    /// Height that would land on the current extent, caption included.
    /// Zero when no body content (only a caption, or nothing) would fit.
    pub first_segment_height: f64,
    /// Natural height of everything left in the block.
    pub would_need: f64,
}

/// Height an atomic piece occupies when placed with `remaining` room left.
///
/// Pieces that fit keep their natural height. A piece that doesn't fit is
/// deferred, except at the top of an empty extent where waiting can't help:
/// there it is shrunk to the room available.
pub(crate) fn placed_height(natural: f64, remaining: f64, at_top: bool) -> Option<f64> {
    if natural <= remaining + FIT_EPSILON {
        Some(natural)
    } else if at_top && remaining > 0.0 {
        Some(remaining)
    } else {
        None
    }
}

/// Running state of one trial pass.
struct Trial {
    available: f64,
    at_top: bool,
    used: f64,
    body_pieces: usize,
    stopped: bool,
}

impl Trial {
    fn at_top_now(&self) -> bool {
        self.at_top && self.used <= FIT_EPSILON
    }

    fn remaining(&self) -> f64 {
        self.available - self.used
    }

    /// Try to place an atomic piece; once one piece is deferred, nothing
    /// after it lands on this extent.
    fn place(&mut self, natural: f64) -> bool {
        if self.stopped {
            return false;
        }
        match placed_height(natural, self.remaining(), self.at_top_now()) {
            Some(h) => {
                self.used += h;
                true
            }
            None => {
                self.stopped = true;
                false
            }
        }
    }
}

impl LayoutEngine {
    /// Measure how `view` would arrange into `available` height with content
    /// width taken from `frame`. `at_top` is whether the extent is still empty.
    pub fn measure(&self, view: &BlockView<'_>, frame: Frame, available: f64, at_top: bool) -> FitReport {
        let block = view.block;
        let mut trial = Trial {
            available,
            at_top,
            used: 0.0,
            body_pieces: 0,
            stopped: false,
        };
        let mut would_need = 0.0;

        if view.caption_pending {
            if let Some(caption) = &block.caption {
                would_need += caption.estimated_height;
                trial.place(caption.estimated_height);
            }
        }

        for (index, fragment) in block.content.iter().enumerate().skip(view.fragment) {
            match fragment {
                Fragment::Text(run) => {
                    let first_line = if index == view.fragment { view.line } else { 0 };
                    let lines = self.measurer.break_lines(run, frame.width());
                    for line in lines.iter().skip(first_line) {
                        would_need += line.height;
                        if trial.place(line.height) {
                            trial.body_pieces += 1;
                        }
                    }
                }
                Fragment::Image(image) => {
                    let (_, height) = image.fitted_size(frame.width());
                    would_need += height;
                    if trial.place(height) {
                        trial.body_pieces += 1;
                    }
                }
                Fragment::Block(inner) => {
                    would_need += self.measure_nested(inner, frame, &mut trial);
                }
            }
        }

        let fits_fully = !trial.stopped;
        let first_segment_height = if fits_fully || trial.body_pieces > 0 {
            trial.used
        } else {
            0.0
        };

        FitReport {
            fits_fully,
            first_segment_height,
            would_need,
        }
    }

    /// Trial-place a nested block. Returns its natural height.
    ///
    /// Mirrors the emitter: a nested block that fits is placed whole; one
    /// that doesn't is still started here when it is breakable or the extent
    /// is empty (its own arrangement then continues on later extents), and
    /// is otherwise deferred whole.
    fn measure_nested(&self, inner: &Block, frame: Frame, trial: &mut Trial) -> f64 {
        let inner_frame = frame.inset(inner.inset.left, inner.inset.right);
        let view = BlockView::start(inner);

        if trial.stopped || trial.remaining() <= 0.0 {
            trial.stopped = true;
            return self.measure(&view, inner_frame, f64::INFINITY, false).would_need;
        }

        let at_top_now = trial.at_top_now();
        let report = self.measure(&view, inner_frame, trial.remaining(), at_top_now);

        if report.fits_fully {
            trial.used += report.first_segment_height;
            trial.body_pieces += 1;
        } else {
            if (inner.breakable || at_top_now) && report.first_segment_height > 0.0 {
                trial.used += report.first_segment_height;
                trial.body_pieces += 1;
            }
            trial.stopped = true;
        }

        report.would_need
    }

    /// Natural height of a whole block, ignoring extent boundaries.
    pub fn natural_height(&self, block: &Block, frame: Frame) -> f64 {
        self.measure(&BlockView::start(block), frame, f64::INFINITY, false)
            .would_need
    }
}
