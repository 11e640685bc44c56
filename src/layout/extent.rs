//! # Extents
//!
//! An extent is a bounded rectangular writing region with a cursor: the body
//! of a page, or a size-constrained container such as a table cell.
//!
//! Coordinates follow PDF orientation. `top` is the highest y, `bottom` the
//! lowest, and the cursor starts at `top` and only ever moves down. The
//! invariant `bottom <= cursor <= top` holds between operations.

use std::fmt;

use serde::Serialize;

use crate::error::LayoutError;
use crate::model::PageConfig;

/// Tolerance for fit comparisons, in points. Cumulative line-height sums
/// drift by a few hundredths; anything inside this band counts as fitting.
pub const FIT_EPSILON: f64 = 1e-2;

/// Identity of an extent within one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtentRef {
    /// Index of the extent's surface in the flow.
    pub id: usize,
    /// 1-based page number the extent lives on.
    pub number: usize,
}

impl fmt::Display for ExtentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} (page {})", self.id, self.number)
    }
}

/// What kind of region this is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtentKind {
    /// A page body. Pages form an endless stream.
    Page,
    /// A single hard-bounded region with no continuation.
    BoundedContainer {
        max_height: f64,
        /// Human-readable name used in diagnostics, e.g. "table cell".
        label: String,
    },
}

/// Horizontal bounds of a writing frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub left: f64,
    pub right: f64,
}

impl Frame {
    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    /// Shrink the frame from both sides.
    pub fn inset(&self, left: f64, right: f64) -> Frame {
        let l = self.left + left;
        Frame {
            left: l,
            right: (self.right - right).max(l),
        }
    }
}

/// A writing region with a cursor.
#[derive(Debug, Clone)]
pub struct Extent {
    pub(crate) reference: ExtentRef,
    pub top: f64,
    pub bottom: f64,
    pub cursor: f64,
    pub frame: Frame,
    pub kind: ExtentKind,
}

impl Extent {
    /// The body of page `number` laid out with `config`.
    pub fn page(id: usize, number: usize, config: &PageConfig) -> Self {
        let (page_w, page_h) = config.size.dimensions();
        let top = page_h - config.margin.top;
        Self {
            reference: ExtentRef { id, number },
            top,
            bottom: config.margin.bottom,
            cursor: top,
            frame: Frame {
                left: config.margin.left,
                right: page_w - config.margin.right,
            },
            kind: ExtentKind::Page,
        }
    }

    /// A bounded container whose top edge sits at `top` on page `number`.
    pub fn bounded(
        id: usize,
        number: usize,
        frame: Frame,
        top: f64,
        max_height: f64,
        label: &str,
    ) -> Self {
        let max_height = max_height.max(0.0);
        Self {
            reference: ExtentRef { id, number },
            top,
            bottom: top - max_height,
            cursor: top,
            frame,
            kind: ExtentKind::BoundedContainer {
                max_height,
                label: label.to_string(),
            },
        }
    }

    pub fn reference(&self) -> ExtentRef {
        self.reference
    }

    /// Height still available below the cursor.
    pub fn remaining(&self) -> f64 {
        match &self.kind {
            ExtentKind::Page => self.cursor - self.bottom,
            ExtentKind::BoundedContainer { max_height, .. } => max_height - self.consumed(),
        }
    }

    /// Height already used on this extent.
    pub fn consumed(&self) -> f64 {
        self.top - self.cursor
    }

    /// Whether nothing has been placed yet.
    pub fn at_top(&self) -> bool {
        self.consumed() <= FIT_EPSILON
    }

    /// The next extent in the stream. Pages continue on a fresh page with
    /// the cursor reset to the top; bounded containers have no successor.
    pub fn advance(&self) -> Result<Extent, LayoutError> {
        match self.kind {
            ExtentKind::Page => Ok(Extent {
                reference: ExtentRef {
                    id: self.reference.id + 1,
                    number: self.reference.number + 1,
                },
                top: self.top,
                bottom: self.bottom,
                cursor: self.top,
                frame: self.frame,
                kind: ExtentKind::Page,
            }),
            ExtentKind::BoundedContainer { .. } => Err(LayoutError::ExtentExhausted {
                extent: self.reference,
            }),
        }
    }

    /// Move the cursor down by `height`. Overshooting by less than
    /// [`FIT_EPSILON`] is absorbed; the cursor never passes `bottom`.
    pub fn consume(&mut self, height: f64) -> Result<(), LayoutError> {
        let remaining = self.remaining();
        if height > remaining + FIT_EPSILON {
            return Err(LayoutError::OverConsumption {
                requested: height,
                remaining,
                extent: self.reference,
            });
        }
        self.cursor = (self.cursor - height.max(0.0)).max(self.bottom);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edges, PageSize};

    fn letter() -> PageConfig {
        PageConfig {
            size: PageSize::Letter,
            margin: Edges::uniform(50.0),
        }
    }

    #[test]
    fn page_extent_geometry() {
        let extent = Extent::page(0, 1, &letter());
        assert_eq!(extent.top, 742.0);
        assert_eq!(extent.bottom, 50.0);
        assert_eq!(extent.cursor, 742.0);
        assert_eq!(extent.frame, Frame { left: 50.0, right: 562.0 });
        assert_eq!(extent.remaining(), 692.0);
        assert!(extent.at_top());
    }

    #[test]
    fn consume_moves_cursor_down() {
        let mut extent = Extent::page(0, 1, &letter());
        extent.consume(100.0).unwrap();
        assert_eq!(extent.cursor, 642.0);
        assert_eq!(extent.remaining(), 592.0);
        assert!(!extent.at_top());
    }

    #[test]
    fn consume_absorbs_rounding_but_clamps_cursor() {
        let mut extent = Extent::page(0, 1, &letter());
        extent.consume(692.005).unwrap();
        assert_eq!(extent.cursor, 50.0);
        assert_eq!(extent.remaining(), 0.0);
    }

    #[test]
    fn over_consumption_is_an_error() {
        let mut extent = Extent::page(0, 1, &letter());
        extent.consume(600.0).unwrap();
        let err = extent.consume(100.0).unwrap_err();
        assert!(matches!(err, LayoutError::OverConsumption { requested, .. } if requested == 100.0));
        assert_eq!(extent.cursor, 142.0);
    }

    #[test]
    fn page_advance_resets_cursor() {
        let mut extent = Extent::page(0, 1, &letter());
        extent.consume(300.0).unwrap();
        let next = extent.advance().unwrap();
        assert_eq!(next.reference(), ExtentRef { id: 1, number: 2 });
        assert_eq!(next.cursor, next.top);
        assert!(next.at_top());
    }

    #[test]
    fn bounded_container_cannot_advance() {
        let frame = Frame { left: 60.0, right: 200.0 };
        let cell = Extent::bounded(0, 4, frame, 700.0, 120.0, "table cell");
        assert_eq!(cell.bottom, 580.0);
        assert_eq!(cell.remaining(), 120.0);
        let err = cell.advance().unwrap_err();
        assert!(matches!(err, LayoutError::ExtentExhausted { extent } if extent.number == 4));
    }

    #[test]
    fn frame_inset_never_inverts() {
        let frame = Frame { left: 0.0, right: 100.0 };
        assert_eq!(frame.inset(10.0, 20.0).width(), 70.0);
        assert_eq!(frame.inset(80.0, 80.0).width(), 0.0);
    }
}
