//! # Anchor Resolution
//!
//! Named destinations are only recorded once the content carrying them has
//! been committed to an extent. The trial pass never touches this table, so a
//! block that later moves to the next page can't leave a stale destination
//! behind.

use std::collections::HashMap;

use serde::Serialize;

use super::extent::ExtentRef;

/// Where a destination landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPosition {
    /// 1-based page number of the extent.
    pub extent_index: usize,
    /// Absolute y of the top of the content carrying the anchor.
    pub offset: f64,
}

/// An anchor observed during emission, not yet registered.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAnchor {
    pub id: String,
    pub extent: ExtentRef,
    pub offset: f64,
}

/// Final positions of all placed anchors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnchorResolver {
    positions: HashMap<String, AnchorPosition>,
}

impl AnchorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an emitted anchor. The first placement of an id wins.
    pub fn record(&mut self, anchor: PlacedAnchor) {
        if self.positions.contains_key(&anchor.id) {
            log::warn!("Duplicate anchor id '{}' ignored", anchor.id);
            return;
        }
        self.positions.insert(
            anchor.id,
            AnchorPosition {
                extent_index: anchor.extent.number,
                offset: anchor.offset,
            },
        );
    }

    pub fn resolve(&self, id: &str) -> Option<AnchorPosition> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
