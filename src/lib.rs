//! # Blockflow
//!
//! A block arrangement engine.
//!
//! Content doesn't get laid out on an endless strip and cut into pages
//! afterwards. It flows *into* extents: page bodies that continue onto the
//! next page, and bounded containers (table cells) that can't continue at
//! all. For every block the engine measures what fits below the cursor,
//! decides whether to keep it, move it, split it or cut it off, and only
//! then commits anything.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    Document: page geometry, blocks, fragments
//!       ↓
//!   [text]     Line breaking and line metrics
//!       ↓
//!   [layout]   Fit estimate → decision → emission → decoration + anchors
//!       ↓
//! LayoutOutput (surfaces, arrangement results, anchors, diagnostics)
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod style;
pub mod text;

pub use error::LayoutError;

use layout::{LayoutEngine, LayoutOutput};
use model::Document;

/// Arrange a document into pages.
///
/// This is the primary entry point. Fails only if the engine detects it
/// placed more content on an extent than the extent holds.
pub fn layout(document: &Document) -> Result<LayoutOutput, LayoutError> {
    LayoutEngine::new().layout(document)
}

/// Arrange a document described as JSON.
pub fn layout_json(json: &str) -> Result<LayoutOutput, LayoutError> {
    let document: Document = serde_json::from_str(json)?;
    layout(&document)
}
