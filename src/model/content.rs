//! Ordered content blocks produced by the layout stage.

use super::{ImageInfo, Table};
use std::cmp::Ordering;

/// Total-order key `(y_position, tie_rank, structural_index)`.
///
/// Native tables use `tie_rank = -1` so they precede text starting at the
/// same vertical position; everything else uses 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortKey {
    /// Top edge of the block
    pub y: f32,
    /// Tie-break rank at equal `y`
    pub tie_rank: i32,
    /// Structural index (or table ordinal for native tables)
    pub index: usize,
}

impl SortKey {
    /// Key for a block at its structural position.
    pub fn at(y: f32, index: usize) -> Self {
        Self {
            y,
            tie_rank: 0,
            index,
        }
    }

    /// Key for a native table; `ordinal` orders tables sharing a top edge.
    pub fn native_table(y: f32, ordinal: usize) -> Self {
        Self {
            y,
            tie_rank: -1,
            index: ordinal,
        }
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then(self.tie_rank.cmp(&other.tie_rank))
            .then(self.index.cmp(&other.index))
    }
}

/// Payload of a content block.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    /// Running text
    Text(String),
    /// A native or detected table
    Table(Table),
    /// A stored image
    Image(ImageInfo),
    /// A unit that failed to load; the string is the visible marker
    Placeholder(String),
}

/// One entry of the ordered per-page content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    /// Block payload
    pub kind: ContentKind,
    /// Sort key
    pub sort_key: SortKey,
    /// Structural indices this block represents
    pub structural_indices: Vec<usize>,
}

impl ContentBlock {
    /// Create a block.
    pub fn new(kind: ContentKind, sort_key: SortKey, structural_indices: Vec<usize>) -> Self {
        Self {
            kind,
            sort_key,
            structural_indices,
        }
    }

    /// Vertical position.
    pub fn y_position(&self) -> f32 {
        self.sort_key.y
    }
}
