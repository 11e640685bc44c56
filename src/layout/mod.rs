//! # Block Arrangement Engine
//!
//! This is the heart of the crate.
//!
//! Content is never laid out on an infinite canvas and sliced afterwards.
//! Each block is arranged directly into a bounded extent (a page body or a
//! size-constrained container) with a cursor:
//!
//! 1. Measure the block (or what is left of it) against the room below the
//!    cursor. The measurement is a trial pass; nothing is drawn.
//! 2. Decide: KEEP it here, ADVANCE it whole to a fresh extent, SPLIT it at
//!    the last line or atomic piece that fits, or TRUNCATE it when the extent
//!    is a bounded container with no continuation.
//! 3. Emit what was decided. The emitter is the only code that moves the
//!    cursor, and it stops exactly where the trial pass said it would.
//! 4. Whatever is left becomes the next arrangement pass on the next extent.
//!    A remainder is a view into the original block, never a copy.
//!
//! Every consumption is recorded as an [`ExtentSpan`] for each block that is
//! currently being arranged, so a block nested three levels deep and its
//! ancestors all know exactly which slice of which extent they occupy. The
//! decoration painter works from those spans alone.

pub mod anchor;
pub mod decoration;
pub mod emit;
pub mod extent;
pub mod fit;
pub mod page_break;

use serde::Serialize;

use crate::error::LayoutError;
use crate::model::{Block, Document, PageConfig};
use crate::style::{Border, Color};
use crate::text::{FixedMetrics, TextMeasurer};

use self::anchor::{AnchorPosition, AnchorResolver};
use self::decoration::DecorationRect;
use self::emit::StopReason;
use self::extent::{Extent, ExtentKind, ExtentRef, Frame, FIT_EPSILON};
use self::page_break::{decide, decide_exhausted, BreakDecision};

// ── Output types ────────────────────────────────────────────────

/// The drawing surface of one extent: a page body, or a bounded container.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPage {
    pub extent: ExtentRef,
    pub kind: ExtentKind,
    pub top: f64,
    pub bottom: f64,
    pub frame: Frame,
    pub elements: Vec<LayoutElement>,
}

/// A positioned element on a surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutElement {
    pub x: f64,
    /// Top edge, in the extent's coordinates (y grows upward).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutElement>,
}

impl LayoutElement {
    pub fn leaf(x: f64, y: f64, width: f64, height: f64, draw: DrawCommand) -> Self {
        Self {
            x,
            y,
            width,
            height,
            draw,
            children: Vec::new(),
        }
    }
}

/// What to draw for an element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    /// Decoration box behind a block's content on one extent.
    #[serde(rename_all = "camelCase")]
    Rect {
        background: Option<Color>,
        border: Option<Border>,
        continued_before: bool,
        continued_after: bool,
    },
    /// One measured line of a text run.
    #[serde(rename_all = "camelCase")]
    Text { text: String, font_size: f64 },
    Caption { text: String },
    Image { src: String },
    /// Dashed rule marking where a bounded container cut its content off.
    TruncationMarker,
}

/// The vertical slice of one extent a block instance consumed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtentSpan {
    pub extent_ref: ExtentRef,
    /// Cursor position where the block started on this extent.
    pub start_offset: f64,
    /// Cursor position where the block ended on this extent.
    pub end_offset: f64,
}

impl ExtentSpan {
    pub fn height(&self) -> f64 {
        self.start_offset - self.end_offset
    }
}

/// Record of exactly which portion of a block landed on which extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangementResult {
    pub extents_used: Vec<ExtentSpan>,
    pub truncated: bool,
    /// Horizontal bounds of the block's decoration box.
    pub frame: Frame,
    /// Results for nested blocks, in the order they were arranged.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ArrangementResult>,
}

impl ArrangementResult {
    /// Total height consumed across every extent.
    pub fn consumed_height(&self) -> f64 {
        self.extents_used.iter().map(ExtentSpan::height).sum()
    }
}

/// A read-only position inside a block: where arrangement resumes.
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a> {
    pub block: &'a Block,
    /// Index of the next fragment to place.
    pub fragment: usize,
    /// First unplaced line when the next fragment is a text run.
    pub line: usize,
    pub caption_pending: bool,
}

impl<'a> BlockView<'a> {
    /// The whole block, caption included.
    pub fn start(block: &'a Block) -> Self {
        Self {
            block,
            fragment: 0,
            line: 0,
            caption_pending: block.caption.is_some(),
        }
    }

    pub fn is_start(&self) -> bool {
        self.fragment == 0 && self.line == 0 && self.caption_pending == self.block.caption.is_some()
    }

    pub fn is_complete(&self) -> bool {
        !self.caption_pending && self.fragment >= self.block.content.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
}

/// Where a diagnostic happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticContext {
    /// e.g. "table cell"
    pub container_kind: String,
    pub page_or_index: usize,
}

/// A structured event surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub context: DiagnosticContext,
    pub message: String,
}

/// Everything produced by arranging a document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    pub pages: Vec<LayoutPage>,
    /// One result per top-level block, in document order.
    pub blocks: Vec<ArrangementResult>,
    pub anchors: AnchorResolver,
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutOutput {
    pub fn resolve_anchor(&self, id: &str) -> Option<AnchorPosition> {
        self.anchors.resolve(id)
    }
}

// ── Flow state ──────────────────────────────────────────────────

/// Position before a block emitted anything, for collecting its elements.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    surface: usize,
    element: usize,
}

/// The current extent and everything arranged so far.
///
/// One flow is threaded through every call of one arrangement run. Page
/// flows grow a new surface on every advance; container flows have exactly
/// one.
#[derive(Debug)]
pub struct Flow {
    pub(crate) extent: Extent,
    surfaces: Vec<LayoutPage>,
    anchors: AnchorResolver,
    diagnostics: Vec<Diagnostic>,
    /// One span list per block currently being arranged, innermost last.
    recorders: Vec<Vec<ExtentSpan>>,
    truncated: bool,
}

impl Flow {
    /// A page stream starting on page 1.
    pub fn new(config: &PageConfig) -> Self {
        Self::with_extent(Extent::page(0, 1, config))
    }

    /// A single bounded container (e.g. a table cell) on page `number`.
    pub fn container(number: usize, frame: Frame, top: f64, max_height: f64, label: &str) -> Self {
        Self::with_extent(Extent::bounded(0, number, frame, top, max_height, label))
    }

    fn with_extent(extent: Extent) -> Self {
        let surface = surface_for(&extent);
        Self {
            extent,
            surfaces: vec![surface],
            anchors: AnchorResolver::new(),
            diagnostics: Vec::new(),
            recorders: Vec::new(),
            truncated: false,
        }
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn surfaces(&self) -> &[LayoutPage] {
        &self.surfaces
    }

    pub fn anchors(&self) -> &AnchorResolver {
        &self.anchors
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Move the cursor down and extend the span of every open block.
    pub(crate) fn consume(&mut self, height: f64) -> Result<(), LayoutError> {
        let start = self.extent.cursor;
        self.extent.consume(height)?;
        let end = self.extent.cursor;
        let extent_ref = self.extent.reference();

        for spans in &mut self.recorders {
            match spans.last_mut() {
                Some(span) if span.extent_ref == extent_ref => span.end_offset = end,
                _ => spans.push(ExtentSpan {
                    extent_ref,
                    start_offset: start,
                    end_offset: end,
                }),
            }
        }
        Ok(())
    }

    /// Continue on a fresh extent.
    pub(crate) fn advance(&mut self) -> Result<(), LayoutError> {
        let mut next = self.extent.advance()?;
        next.reference.id = self.surfaces.len();
        log::debug!("Advancing from extent {} to {}", self.extent.reference(), next.reference());
        self.surfaces.push(surface_for(&next));
        self.extent = next;
        Ok(())
    }

    pub(crate) fn push_element(&mut self, element: LayoutElement) {
        if let Some(surface) = self.surfaces.last_mut() {
            surface.elements.push(element);
        }
    }

    pub(crate) fn mark(&self) -> Mark {
        let surface = self.surfaces.len() - 1;
        Mark {
            surface,
            element: self.surfaces[surface].elements.len(),
        }
    }

    /// Wrap the elements a block emitted since `mark` in its decoration
    /// rectangles, one per extent.
    pub(crate) fn apply_decoration(&mut self, rects: &[DecorationRect], mark: Mark) {
        for rect in rects {
            let index = rect.extent.id;
            let Some(surface) = self.surfaces.get_mut(index) else {
                continue;
            };
            let from = if index == mark.surface {
                mark.element
            } else {
                0
            };
            let children: Vec<LayoutElement> = surface.elements.drain(from.min(surface.elements.len())..).collect();
            surface.elements.push(LayoutElement {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                draw: DrawCommand::Rect {
                    background: rect.background,
                    border: rect.border,
                    continued_before: rect.continued_before,
                    continued_after: rect.continued_after,
                },
                children,
            });
        }
    }

    /// Close the current bounded container: draw the marker at the cursor and
    /// report it once.
    pub(crate) fn truncate(&mut self) {
        if self.truncated {
            return;
        }
        self.truncated = true;

        let frame = self.extent.frame;
        let y = self.extent.cursor;
        self.push_element(LayoutElement::leaf(
            frame.left,
            y,
            frame.width(),
            0.0,
            DrawCommand::TruncationMarker,
        ));

        let context = self.context();
        let message = format!(
            "the {} on page {} has been truncated",
            context.container_kind, context.page_or_index
        );
        log::error!("{}", message);
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            context,
            message,
        });
    }

    /// Report content that had to be shrunk to fit an empty extent.
    pub(crate) fn warn_shrunk(&mut self, natural: f64, placed: f64) {
        let context = self.context();
        let message = format!(
            "content of {:.2}pt on page {} was scaled to {:.2}pt to fit the {}",
            natural, context.page_or_index, placed, context.container_kind
        );
        log::warn!("{}", message);
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            context,
            message,
        });
    }

    fn context(&self) -> DiagnosticContext {
        let container_kind = match &self.extent.kind {
            ExtentKind::BoundedContainer { label, .. } => label.clone(),
            ExtentKind::Page => "page".to_string(),
        };
        DiagnosticContext {
            container_kind,
            page_or_index: self.extent.reference().number,
        }
    }

    /// Finish the run.
    pub fn into_output(self, blocks: Vec<ArrangementResult>) -> LayoutOutput {
        LayoutOutput {
            pages: self.surfaces,
            blocks,
            anchors: self.anchors,
            diagnostics: self.diagnostics,
        }
    }
}

fn surface_for(extent: &Extent) -> LayoutPage {
    LayoutPage {
        extent: extent.reference(),
        kind: extent.kind.clone(),
        top: extent.top,
        bottom: extent.bottom,
        frame: extent.frame,
        elements: Vec::new(),
    }
}

// ── Engine ──────────────────────────────────────────────────────

/// The arrangement engine.
pub struct LayoutEngine {
    pub(crate) measurer: Box<dyn TextMeasurer>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::with_measurer(FixedMetrics::default())
    }

    pub fn with_measurer(measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            measurer: Box::new(measurer),
        }
    }

    /// Main entry point: arrange a document into pages.
    pub fn layout(&self, document: &Document) -> Result<LayoutOutput, LayoutError> {
        let mut flow = Flow::new(&document.page);
        let capacity = flow.extent.remaining();
        if capacity <= FIT_EPSILON {
            return Err(LayoutError::InvalidGeometry { capacity });
        }
        let mut results = Vec::with_capacity(document.blocks.len());

        for (index, block) in document.blocks.iter().enumerate() {
            if block.break_before && !flow.extent.at_top() {
                flow.advance()?;
            } else if index > 0 && document.block_gap > 0.0 && !flow.extent.at_top() {
                let gap = document.block_gap.min(flow.extent.remaining().max(0.0));
                flow.consume(gap)?;
            }
            results.push(self.arrange(block, &mut flow)?);
        }

        log::info!(
            "Arranged {} blocks onto {} pages ({} anchors, {} diagnostics)",
            results.len(),
            flow.surfaces.len(),
            flow.anchors.len(),
            flow.diagnostics.len()
        );
        Ok(flow.into_output(results))
    }

    /// Arrange one block at the flow's cursor, using the full extent frame.
    pub fn arrange(&self, block: &Block, flow: &mut Flow) -> Result<ArrangementResult, LayoutError> {
        let frame = flow.extent.frame;
        if flow.truncated {
            return Ok(ArrangementResult {
                extents_used: Vec::new(),
                truncated: true,
                frame,
                nested: Vec::new(),
            });
        }
        self.arrange_in(block, flow, frame)
    }

    /// Arrange `block` with its decoration box spanning `frame`.
    pub(crate) fn arrange_in(
        &self,
        block: &Block,
        flow: &mut Flow,
        frame: Frame,
    ) -> Result<ArrangementResult, LayoutError> {
        let mark = flow.mark();
        flow.recorders.push(Vec::new());
        let content_frame = frame.inset(block.inset.left, block.inset.right);
        let outcome = self.arrange_loop(block, flow, content_frame);
        let mut extents_used = flow.recorders.pop().unwrap_or_default();
        let (truncated, nested) = outcome?;

        if extents_used.is_empty() && !truncated {
            let cursor = flow.extent.cursor;
            extents_used.push(ExtentSpan {
                extent_ref: flow.extent.reference(),
                start_offset: cursor,
                end_offset: cursor,
            });
        }

        let result = ArrangementResult {
            extents_used,
            truncated,
            frame,
            nested,
        };

        if let Some(style) = &block.decoration {
            let rects = decoration::paint(&result, style);
            flow.apply_decoration(&rects, mark);
        }
        Ok(result)
    }

    /// The KEEP / ADVANCE / SPLIT / TRUNCATE state machine. Returns whether
    /// the block was truncated, and the results of its nested blocks.
    fn arrange_loop(
        &self,
        block: &Block,
        flow: &mut Flow,
        frame: Frame,
    ) -> Result<(bool, Vec<ArrangementResult>), LayoutError> {
        let mut view = BlockView::start(block);
        let mut nested = Vec::new();

        while !view.is_complete() {
            let available = flow.extent.remaining();
            let at_top = flow.extent.at_top();
            let decision = if available <= 0.0 {
                if at_top && flow.extent.kind == ExtentKind::Page {
                    // a fresh page with no room; advancing would never end
                    return Err(LayoutError::InvalidGeometry { capacity: available });
                }
                decide_exhausted(&flow.extent.kind)
            } else {
                let report = self.measure(&view, frame, available, at_top);
                decide(&report, block.breakable, at_top, &flow.extent.kind)
            };
            log::debug!(
                "{:?} on extent {} ({:.2}pt available, at top: {})",
                decision,
                flow.extent.reference(),
                available,
                at_top
            );

            if decision == BreakDecision::Advance {
                if !advance_or_truncate(flow)? {
                    return Ok((true, nested));
                }
                continue;
            }

            let report = self.emit(&view, flow, frame)?;
            for anchor in report.anchors {
                flow.anchors.record(anchor);
            }
            nested.extend(report.nested);
            view = report.next;

            match report.stopped_reason {
                StopReason::Completed => break,
                StopReason::Truncated => return Ok((true, nested)),
                StopReason::ExtentFull => {
                    if decision == BreakDecision::Truncate {
                        flow.truncate();
                        return Ok((true, nested));
                    }
                    if decision == BreakDecision::Keep {
                        return Err(LayoutError::FitMismatch {
                            extent: flow.extent.reference(),
                            cursor: flow.extent.cursor,
                        });
                    }
                    if !advance_or_truncate(flow)? {
                        return Ok((true, nested));
                    }
                }
            }
        }

        Ok((false, nested))
    }
}

/// Advance the flow, turning a bounded container's refusal into truncation.
/// Returns `false` when the block was truncated.
fn advance_or_truncate(flow: &mut Flow) -> Result<bool, LayoutError> {
    match flow.advance() {
        Ok(()) => Ok(true),
        Err(LayoutError::ExtentExhausted { extent }) => {
            log::debug!("Extent {} cannot advance; truncating", extent);
            flow.truncate();
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Caption, Edges, Fragment, ImageFragment, PageSize, TextRun};
    use crate::style::Decoration;
    use crate::text::MeasuredLine;
    use std::cell::Cell;

    fn config() -> PageConfig {
        PageConfig {
            size: PageSize::Custom {
                width: 300.0,
                height: 240.0,
            },
            margin: Edges::uniform(20.0),
        }
    }

    /// `n` lines of 20pt each.
    fn lines(n: usize) -> Fragment {
        let content = vec!["block content"; n].join("\n");
        Fragment::Text(TextRun::new(&content, 10.0, 2.0))
    }

    /// Breaks into one line on the first call and a page's worth after.
    struct Inconsistent {
        calls: Cell<usize>,
    }

    impl TextMeasurer for Inconsistent {
        fn break_lines(&self, _run: &TextRun, _max_width: f64) -> Vec<MeasuredLine> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            let count = if call == 0 { 1 } else { 20 };
            (0..count)
                .map(|_| MeasuredLine {
                    text: "x".to_string(),
                    width: 5.0,
                    height: 20.0,
                })
                .collect()
        }
    }

    fn cell() -> Flow {
        Flow::container(3, Frame { left: 40.0, right: 140.0 }, 500.0, 100.0, "table cell")
    }

    #[test]
    fn view_positions() {
        let block = Block {
            caption: Some(Caption {
                text: "title".to_string(),
                estimated_height: 15.0,
            }),
            ..Block::new(vec![lines(2)])
        };
        let view = BlockView::start(&block);
        assert!(view.is_start());
        assert!(!view.is_complete());

        let empty = Block::new(vec![]);
        assert!(BlockView::start(&empty).is_complete());
    }

    #[test]
    fn consume_records_spans_for_every_open_block() {
        let mut flow = Flow::new(&config());
        flow.recorders.push(Vec::new());
        flow.consume(50.0).unwrap();
        flow.recorders.push(Vec::new());
        flow.consume(30.0).unwrap();
        flow.advance().unwrap();
        flow.consume(10.0).unwrap();

        let inner = flow.recorders.pop().unwrap();
        let outer = flow.recorders.pop().unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[0].start_offset, 170.0);
        assert_eq!(inner[0].end_offset, 140.0);
        assert_eq!(outer[0].height(), 80.0);
        assert_eq!(outer[1].extent_ref, ExtentRef { id: 1, number: 2 });
        assert_eq!(outer[1].height(), 10.0);
    }

    #[test]
    fn estimate_and_emission_disagreeing_is_an_error() {
        let engine = LayoutEngine::with_measurer(Inconsistent { calls: Cell::new(0) });
        let mut flow = Flow::new(&config());
        let err = engine.arrange(&Block::new(vec![lines(1)]), &mut flow).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::FitMismatch { extent, cursor } if extent.number == 1 && cursor == 20.0
        ));
    }

    #[test]
    fn page_without_body_height_is_rejected() {
        let engine = LayoutEngine::new();
        let squashed = PageConfig {
            size: PageSize::Custom {
                width: 300.0,
                height: 100.0,
            },
            margin: Edges::uniform(50.0),
        };
        let mut flow = Flow::new(&squashed);
        let err = engine.arrange(&Block::new(vec![lines(1)]), &mut flow).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidGeometry { capacity } if capacity == 0.0));
        assert_eq!(flow.surfaces().len(), 1);
    }

    #[test]
    fn keep_places_whole_block() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        let result = engine.arrange(&Block::new(vec![lines(3)]), &mut flow).unwrap();
        assert_eq!(result.extents_used.len(), 1);
        assert_eq!(result.extents_used[0].start_offset, 220.0);
        assert_eq!(result.extents_used[0].end_offset, 160.0);
        assert!(!result.truncated);
    }

    #[test]
    fn empty_block_gets_zero_height_span() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        flow.consume(40.0).unwrap();
        let result = engine.arrange(&Block::new(vec![]), &mut flow).unwrap();
        assert_eq!(result.extents_used.len(), 1);
        assert_eq!(result.extents_used[0].start_offset, 180.0);
        assert_eq!(result.extents_used[0].height(), 0.0);
    }

    #[test]
    fn container_truncates_once() {
        let engine = LayoutEngine::new();
        let mut flow = cell();
        let result = engine.arrange(&Block::new(vec![lines(8)]), &mut flow).unwrap();
        assert!(result.truncated);
        assert_eq!(result.consumed_height(), 100.0);
        assert_eq!(flow.diagnostics().len(), 1);
        assert_eq!(flow.diagnostics()[0].message, "the table cell on page 3 has been truncated");

        // a later sibling in the same closed container produces nothing
        let sibling = engine.arrange(&Block::new(vec![lines(1)]), &mut flow).unwrap();
        assert!(sibling.truncated);
        assert!(sibling.extents_used.is_empty());
        assert_eq!(flow.diagnostics().len(), 1);
    }

    #[test]
    fn unbreakable_block_in_partly_used_container_is_truncated_empty() {
        let engine = LayoutEngine::new();
        let mut flow = cell();
        engine.arrange(&Block::new(vec![lines(2)]), &mut flow).unwrap();
        let block = Block {
            breakable: false,
            ..Block::new(vec![lines(4)])
        };
        let result = engine.arrange(&block, &mut flow).unwrap();
        assert!(result.truncated);
        assert!(result.extents_used.is_empty());
        assert_eq!(flow.extent().cursor, 460.0);
    }

    #[test]
    fn nested_truncation_stops_the_parent_without_a_second_diagnostic() {
        let engine = LayoutEngine::new();
        let mut flow = cell();
        let inner = Block::new(vec![lines(8)]);
        let outer = Block::new(vec![lines(1), Fragment::Block(inner), lines(1)]);
        let result = engine.arrange(&outer, &mut flow).unwrap();
        assert!(result.truncated);
        assert_eq!(result.nested.len(), 1);
        assert!(result.nested[0].truncated);
        assert_eq!(result.consumed_height(), 100.0);
        assert_eq!(flow.diagnostics().len(), 1);
    }

    #[test]
    fn decoration_wraps_emitted_elements() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        let block = Block {
            decoration: Some(Decoration {
                background: Some(Color::rgb(0.9, 0.9, 0.9)),
                border: None,
            }),
            ..Block::new(vec![lines(2)])
        };
        engine.arrange(&block, &mut flow).unwrap();

        let elements = &flow.surfaces()[0].elements;
        assert_eq!(elements.len(), 1);
        assert!(matches!(elements[0].draw, DrawCommand::Rect { .. }));
        assert_eq!(elements[0].children.len(), 2);
        assert_eq!(elements[0].height, 40.0);
    }

    #[test]
    fn shrunk_image_at_top_still_makes_progress() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        let block = Block::new(vec![Fragment::Image(ImageFragment {
            src: "poster.png".to_string(),
            width: 100.0,
            height: 500.0,
            anchor: None,
        })]);
        let result = engine.arrange(&block, &mut flow).unwrap();
        assert_eq!(result.extents_used.len(), 1);
        assert!((result.consumed_height() - 200.0).abs() < FIT_EPSILON);
        let image = &flow.surfaces()[0].elements[0];
        assert_eq!(image.width, 40.0);
        assert_eq!(flow.diagnostics().len(), 1);
        assert_eq!(flow.diagnostics()[0].severity, Severity::Warning);
        assert_eq!(
            flow.diagnostics()[0].message,
            "content of 500.00pt on page 1 was scaled to 200.00pt to fit the page"
        );
    }
}
