//! # Document Model
//!
//! The input to the arrangement engine: a page configuration and an ordered
//! sequence of blocks. Each block is a list of already-shaped fragments
//! (text runs, images, nested blocks) plus the attributes that steer page
//! breaking: whether it may be split, an optional caption, decoration, and
//! anchor ids for cross references.
//!
//! Everything here is plain data. Parsing a markup language into blocks and
//! resolving theme attributes happens before this model is built.

use crate::style::Decoration;
use serde::{Deserialize, Serialize};

/// A complete document ready for arrangement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Geometry of every page in the stream.
    #[serde(default)]
    pub page: PageConfig,

    /// Top-level blocks, arranged in order.
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Vertical space consumed between consecutive top-level blocks.
    /// Suppressed at the top of a page.
    #[serde(default)]
    pub block_gap: f64,
}

/// Configuration for a page: size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default = "PageSize::default")]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default)]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: Edges::uniform(54.0), // ~0.75 inch
        }
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for page margins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Horizontal inset of a block's content inside its decoration box.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Insets {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

/// A unit of flowing content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Fragments in reading order.
    #[serde(default)]
    pub content: Vec<Fragment>,

    /// Whether the block may be split across extents. When `false`, a block
    /// that doesn't fit below the top of an extent moves to a fresh one.
    #[serde(default = "default_true")]
    pub breakable: bool,

    /// Title kept on the same extent as the first line of the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<Caption>,

    /// Background and border painted over every extent the block spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,

    /// Destinations that resolve to where the block actually starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchor_ids: Vec<String>,

    /// Start this block on a fresh page (top-level blocks only).
    #[serde(default)]
    pub break_before: bool,

    /// Content inset from the decoration box.
    #[serde(default)]
    pub inset: Insets,
}

fn default_true() -> bool {
    true
}

/// A block title with a pre-computed height.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub text: String,
    pub estimated_height: f64,
}

/// The closed set of things a block can contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Fragment {
    /// Wrapped text. May break between lines, never inside one.
    Text(TextRun),
    /// An atomic image.
    Image(ImageFragment),
    /// A block inside a block, arranged with the same rules.
    Block(Block),
}

/// A run of text with uniform line metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub content: String,
    /// Font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Line height as a multiplier of font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Destination resolved to the top of the run's first placed line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

fn default_font_size() -> f64 {
    12.0
}

fn default_line_height() -> f64 {
    1.4
}

/// An image with fixed display dimensions in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFragment {
    #[serde(default)]
    pub src: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl Block {
    /// Create a breakable block holding the given fragments.
    pub fn new(content: Vec<Fragment>) -> Self {
        Self {
            content,
            breakable: true,
            ..Default::default()
        }
    }
}

impl TextRun {
    pub fn new(content: &str, font_size: f64, line_height: f64) -> Self {
        Self {
            content: content.to_string(),
            font_size,
            line_height,
            anchor: None,
        }
    }

    /// Height of one line of this run.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

impl ImageFragment {
    /// Display size inside a frame of the given width. Images wider than the
    /// frame are scaled down, preserving aspect ratio.
    pub fn fitted_size(&self, frame_width: f64) -> (f64, f64) {
        if self.width > frame_width && self.width > 0.0 {
            let scale = frame_width / self.width;
            (frame_width, self.height * scale)
        } else {
            (self.width, self.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_config_defaults_to_a4() {
        let config: PageConfig = serde_json::from_str(r#"{ "margin": { "top": 36, "right": 36, "bottom": 36, "left": 36 } }"#).unwrap();
        assert_eq!(config.size.dimensions(), (595.28, 841.89));
        assert_eq!(config.margin.top, 36.0);
    }

    #[test]
    fn block_defaults_to_breakable() {
        let block: Block = serde_json::from_str(r#"{ "content": [] }"#).unwrap();
        assert!(block.breakable);
        assert!(block.caption.is_none());
        assert!(block.anchor_ids.is_empty());
    }

    #[test]
    fn fragments_are_tagged() {
        let json = r#"{
            "content": [
                { "type": "Text", "content": "hello" },
                { "type": "Image", "width": 100, "height": 50 },
                { "type": "Block", "breakable": false, "content": [] }
            ]
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.content.len(), 3);
        assert!(matches!(block.content[0], Fragment::Text(ref run) if run.font_size == 12.0));
        assert!(matches!(block.content[2], Fragment::Block(ref nested) if !nested.breakable));
    }

    #[test]
    fn wide_image_scales_to_frame() {
        let image = ImageFragment {
            src: "tux.png".to_string(),
            width: 400.0,
            height: 200.0,
            anchor: None,
        };
        assert_eq!(image.fitted_size(200.0), (200.0, 100.0));
        assert_eq!(image.fitted_size(500.0), (400.0, 200.0));
    }
}
