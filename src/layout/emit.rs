//! # Content Emission
//!
//! The committed pass. Walks a block from its current position, draws each
//! piece onto the current extent's surface and moves the cursor, stopping
//! before the first piece that would overconsume. Text stops between lines,
//! images are all-or-nothing, nested blocks are handed back to the
//! arrangement loop.
//!
//! Anchors seen along the way are returned in the report rather than
//! registered, so nothing is resolved until the emission has happened.

use super::anchor::PlacedAnchor;
use super::extent::{Frame, FIT_EPSILON};
use super::fit::placed_height;
use super::{ArrangementResult, BlockView, DrawCommand, Flow, LayoutElement, LayoutEngine};
use crate::error::LayoutError;
use crate::model::{Block, Fragment, ImageFragment, TextRun};

/// Why emission stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every remaining piece of the block was placed.
    Completed,
    /// The next piece doesn't fit on the current extent.
    ExtentFull,
    /// A nested block was truncated; its container is closed.
    Truncated,
}

/// What one emission pass did.
#[derive(Debug, Clone)]
pub struct EmitReport<'a> {
    /// Total height placed, across every extent touched.
    pub consumed_height: f64,
    pub stopped_reason: StopReason,
    /// Where the block resumes.
    pub next: BlockView<'a>,
    /// Anchors carried by placed content, ready to be recorded.
    pub anchors: Vec<PlacedAnchor>,
    /// Results of nested blocks arranged during this pass.
    pub nested: Vec<ArrangementResult>,
}

impl<'a> EmitReport<'a> {
    fn new(next: BlockView<'a>) -> Self {
        Self {
            consumed_height: 0.0,
            stopped_reason: StopReason::Completed,
            next,
            anchors: Vec::new(),
            nested: Vec::new(),
        }
    }

    fn stop(mut self, reason: StopReason) -> Self {
        self.stopped_reason = reason;
        self
    }
}

/// Emission state for one pass over a block.
struct Pass<'a> {
    report: EmitReport<'a>,
    /// Block-level anchors wait for the first piece of the block.
    block_anchors_pending: bool,
}

impl<'a> Pass<'a> {
    fn claim_block_anchors(&mut self, flow: &Flow) {
        if !self.block_anchors_pending {
            return;
        }
        self.block_anchors_pending = false;
        let extent = flow.extent.reference();
        let offset = flow.extent.cursor;
        for id in &self.report.next.block.anchor_ids {
            self.report.anchors.push(PlacedAnchor {
                id: id.clone(),
                extent,
                offset,
            });
        }
    }

    /// Place one atomic piece at the cursor, or report that it must wait.
    fn place(
        &mut self,
        flow: &mut Flow,
        natural: f64,
        anchor: Option<&String>,
        element: impl FnOnce(f64, f64) -> LayoutElement,
    ) -> Result<bool, LayoutError> {
        let Some(height) =
            placed_height(natural, flow.extent.remaining(), flow.extent.at_top())
        else {
            return Ok(false);
        };
        if height < natural - FIT_EPSILON {
            flow.warn_shrunk(natural, height);
        }

        self.claim_block_anchors(flow);
        let top = flow.extent.cursor;
        if let Some(id) = anchor {
            self.report.anchors.push(PlacedAnchor {
                id: id.clone(),
                extent: flow.extent.reference(),
                offset: top,
            });
        }

        flow.push_element(element(top, height));
        flow.consume(height)?;
        self.report.consumed_height += height;
        Ok(true)
    }
}

impl LayoutEngine {
    /// Emit as much of `view` as the current extent holds, starting at the
    /// cursor. `frame` is the content frame of the block.
    pub(crate) fn emit<'a>(
        &self,
        view: &BlockView<'a>,
        flow: &mut Flow,
        frame: Frame,
    ) -> Result<EmitReport<'a>, LayoutError> {
        let block = view.block;
        let mut pass = Pass {
            report: EmitReport::new(*view),
            block_anchors_pending: view.is_start(),
        };

        if pass.report.next.caption_pending {
            if let Some(caption) = &block.caption {
                let text = caption.text.clone();
                let placed = pass.place(flow, caption.estimated_height, None, |y, height| {
                    LayoutElement::leaf(frame.left, y, frame.width(), height, DrawCommand::Caption { text })
                })?;
                if !placed {
                    return Ok(pass.report.stop(StopReason::ExtentFull));
                }
            }
            pass.report.next.caption_pending = false;
        }

        while pass.report.next.fragment < block.content.len() {
            let reason = match &block.content[pass.report.next.fragment] {
                Fragment::Text(run) => self.emit_text(run, flow, frame, &mut pass)?,
                Fragment::Image(image) => emit_image(image, flow, frame, &mut pass)?,
                Fragment::Block(inner) => self.emit_nested(inner, flow, frame, &mut pass)?,
            };
            if let Some(reason) = reason {
                return Ok(pass.report.stop(reason));
            }
            pass.report.next.fragment += 1;
            pass.report.next.line = 0;
        }

        Ok(pass.report)
    }

    fn emit_text(
        &self,
        run: &TextRun,
        flow: &mut Flow,
        frame: Frame,
        pass: &mut Pass<'_>,
    ) -> Result<Option<StopReason>, LayoutError> {
        let lines = self.measurer.break_lines(run, frame.width());
        while pass.report.next.line < lines.len() {
            let index = pass.report.next.line;
            let line = &lines[index];
            let anchor = if index == 0 { run.anchor.as_ref() } else { None };
            let placed = pass.place(flow, line.height, anchor, |y, height| {
                LayoutElement::leaf(
                    frame.left,
                    y,
                    line.width,
                    height,
                    DrawCommand::Text {
                        text: line.text.clone(),
                        font_size: run.font_size,
                    },
                )
            })?;
            if !placed {
                return Ok(Some(StopReason::ExtentFull));
            }
            pass.report.next.line += 1;
        }
        Ok(None)
    }

    fn emit_nested(
        &self,
        inner: &Block,
        flow: &mut Flow,
        frame: Frame,
        pass: &mut Pass<'_>,
    ) -> Result<Option<StopReason>, LayoutError> {
        let remaining = flow.extent.remaining();
        if remaining <= 0.0 {
            return Ok(Some(StopReason::ExtentFull));
        }

        let at_top = flow.extent.at_top();
        let inner_frame = frame.inset(inner.inset.left, inner.inset.right);
        let trial = self.measure(&BlockView::start(inner), inner_frame, remaining, at_top);
        if !(trial.fits_fully || inner.breakable || at_top) {
            return Ok(Some(StopReason::ExtentFull));
        }

        let result = self.arrange_in(inner, flow, frame)?;
        if pass.block_anchors_pending {
            match result.extents_used.first() {
                Some(first) => {
                    pass.block_anchors_pending = false;
                    for id in &pass.report.next.block.anchor_ids {
                        pass.report.anchors.push(PlacedAnchor {
                            id: id.clone(),
                            extent: first.extent_ref,
                            offset: first.start_offset,
                        });
                    }
                }
                None if result.truncated => {
                    log::debug!(
                        "Nested block truncated before placing anything; anchoring at {:.2} on extent {}",
                        flow.extent.cursor,
                        flow.extent.reference()
                    );
                    pass.claim_block_anchors(flow);
                }
                None => {}
            }
        }
        pass.report.consumed_height += result.consumed_height();
        let truncated = result.truncated;
        pass.report.nested.push(result);

        if truncated {
            // the nested block is finished, even though cut short
            pass.report.next.fragment += 1;
            pass.report.next.line = 0;
            return Ok(Some(StopReason::Truncated));
        }
        Ok(None)
    }
}

fn emit_image(
    image: &ImageFragment,
    flow: &mut Flow,
    frame: Frame,
    pass: &mut Pass<'_>,
) -> Result<Option<StopReason>, LayoutError> {
    let (width, natural) = image.fitted_size(frame.width());
    let placed = pass.place(flow, natural, image.anchor.as_ref(), |y, height| {
        let scaled_width = if natural > 0.0 {
            width * height / natural
        } else {
            width
        };
        LayoutElement::leaf(
            frame.left,
            y,
            scaled_width,
            height,
            DrawCommand::Image {
                src: image.src.clone(),
            },
        )
    })?;
    Ok(if placed {
        None
    } else {
        Some(StopReason::ExtentFull)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Caption, Edges, PageConfig, PageSize};

    fn config() -> PageConfig {
        PageConfig {
            size: PageSize::Custom {
                width: 300.0,
                height: 240.0,
            },
            margin: Edges::uniform(20.0),
        }
    }

    fn lines(n: usize) -> Fragment {
        let content = vec!["block content"; n].join("\n");
        Fragment::Text(TextRun::new(&content, 10.0, 2.0))
    }

    #[test]
    fn emits_until_extent_is_full() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        let block = Block::new(vec![lines(12)]);
        let frame = flow.extent().frame;

        let report = engine.emit(&BlockView::start(&block), &mut flow, frame).unwrap();
        assert_eq!(report.stopped_reason, StopReason::ExtentFull);
        assert_eq!(report.consumed_height, 200.0);
        assert_eq!(report.next.fragment, 0);
        assert_eq!(report.next.line, 10);
        assert_eq!(flow.extent().cursor, 20.0);
        assert_eq!(flow.surfaces()[0].elements.len(), 10);
    }

    #[test]
    fn caption_that_does_not_fit_stops_immediately() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        flow.consume(190.0).unwrap();
        let block = Block {
            caption: Some(Caption {
                text: "title".to_string(),
                estimated_height: 19.0,
            }),
            ..Block::new(vec![lines(1)])
        };
        let frame = flow.extent().frame;

        let report = engine.emit(&BlockView::start(&block), &mut flow, frame).unwrap();
        assert_eq!(report.stopped_reason, StopReason::ExtentFull);
        assert_eq!(report.consumed_height, 0.0);
        assert!(report.next.caption_pending);
        assert!(flow.surfaces()[0].elements.is_empty());
    }

    #[test]
    fn anchors_are_reported_not_recorded() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        let block = Block {
            anchor_ids: vec!["block-id".to_string()],
            ..Block::new(vec![lines(2)])
        };
        let frame = flow.extent().frame;

        let report = engine.emit(&BlockView::start(&block), &mut flow, frame).unwrap();
        assert_eq!(report.stopped_reason, StopReason::Completed);
        assert_eq!(report.anchors.len(), 1);
        assert_eq!(report.anchors[0].offset, 220.0);
        assert!(flow.anchors().resolve("block-id").is_none());
    }

    #[test]
    fn anchors_survive_a_leading_nested_block_truncated_empty() {
        let engine = LayoutEngine::new();
        let frame = Frame {
            left: 40.0,
            right: 240.0,
        };
        let mut flow = Flow::container(2, frame, 500.0, 100.0, "table cell");
        flow.consume(40.0).unwrap();
        let inner = Block::new(vec![Fragment::Image(ImageFragment {
            src: "chart.png".to_string(),
            width: 100.0,
            height: 80.0,
            anchor: None,
        })]);
        let block = Block {
            anchor_ids: vec!["cell-body".to_string()],
            ..Block::new(vec![Fragment::Block(inner)])
        };

        let report = engine.emit(&BlockView::start(&block), &mut flow, frame).unwrap();
        assert_eq!(report.stopped_reason, StopReason::Truncated);
        assert_eq!(report.consumed_height, 0.0);
        assert!(report.nested[0].extents_used.is_empty());
        assert_eq!(report.anchors.len(), 1);
        assert_eq!(report.anchors[0].id, "cell-body");
        assert_eq!(report.anchors[0].offset, 460.0);
        assert_eq!(report.anchors[0].extent.number, 2);
    }

    #[test]
    fn image_is_never_split() {
        let engine = LayoutEngine::new();
        let mut flow = Flow::new(&config());
        flow.consume(150.0).unwrap();
        let block = Block::new(vec![Fragment::Image(ImageFragment {
            src: "tux.png".to_string(),
            width: 100.0,
            height: 80.0,
            anchor: None,
        })]);
        let frame = flow.extent().frame;

        let report = engine.emit(&BlockView::start(&block), &mut flow, frame).unwrap();
        assert_eq!(report.stopped_reason, StopReason::ExtentFull);
        assert_eq!(report.consumed_height, 0.0);
        assert_eq!(flow.extent().cursor, 70.0);
    }
}
