//! Positioned primitives for paged-layout formats.

use super::{BBox, RawImage};
use serde::{Deserialize, Serialize};

/// One contiguous line of text with its bounding box.
///
/// `structural_index` is the position of the owning block in the page's
/// block list; all lines of one block share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Line text
    pub text: String,
    /// Line bounds
    pub bbox: BBox,
    /// Owning block position
    pub structural_index: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, bbox: BBox, structural_index: usize) -> Self {
        Self {
            text: text.into(),
            bbox,
            structural_index,
        }
    }
}

/// A line inside a text block, as emitted by a page reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Line text
    pub text: String,
    /// Line bounds
    pub bbox: BBox,
}

impl TextLine {
    /// Create a line.
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A structural block on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutBlock {
    /// A text block made of lines
    Text {
        /// Block bounds
        bbox: BBox,
        /// Lines in reading order
        #[serde(default)]
        lines: Vec<TextLine>,
    },
    /// A placed picture
    Picture {
        /// Placement bounds
        bbox: BBox,
    },
}

impl LayoutBlock {
    /// Create a text block.
    pub fn text(bbox: BBox, lines: Vec<TextLine>) -> Self {
        LayoutBlock::Text { bbox, lines }
    }

    /// Create a picture block.
    pub fn picture(bbox: BBox) -> Self {
        LayoutBlock::Picture { bbox }
    }

    /// Bounds of the block.
    pub fn bbox(&self) -> BBox {
        match self {
            LayoutBlock::Text { bbox, .. } | LayoutBlock::Picture { bbox } => *bbox,
        }
    }

    /// Concatenated non-empty line text, or `None` for pictures and blank blocks.
    pub fn text_content(&self) -> Option<String> {
        match self {
            LayoutBlock::Text { lines, .. } => {
                let parts: Vec<&str> = lines
                    .iter()
                    .map(|l| l.text.trim())
                    .filter(|t| !t.is_empty())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
            LayoutBlock::Picture { .. } => None,
        }
    }

    /// Check if this is a picture block.
    pub fn is_picture(&self) -> bool {
        matches!(self, LayoutBlock::Picture { .. })
    }
}

/// A table object exposed natively by the page reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTable {
    /// Table bounds
    pub bbox: BBox,
    /// Cell matrix; rows may be ragged
    pub cells: Vec<Vec<String>>,
}

impl NativeTable {
    /// Create a native table.
    pub fn new(bbox: BBox, cells: Vec<Vec<String>>) -> Self {
        Self { bbox, cells }
    }
}

/// Everything a reader produced for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: usize,
    /// Blocks in structural order
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,
    /// Native table objects
    #[serde(default)]
    pub tables: Vec<NativeTable>,
    /// Image payloads in discovery order
    #[serde(default)]
    pub images: Vec<RawImage>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Add a block; its structural index is its position.
    pub fn add_block(&mut self, block: LayoutBlock) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// One span per non-empty text line, tagged with its block index.
    pub fn spans(&self) -> Vec<Span> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(idx, block)| match block {
                LayoutBlock::Text { lines, .. } => Some((idx, lines)),
                LayoutBlock::Picture { .. } => None,
            })
            .flat_map(|(idx, lines)| {
                lines
                    .iter()
                    .filter(|l| !l.text.trim().is_empty())
                    .map(move |l| Span::new(l.text.trim(), l.bbox, idx))
            })
            .collect()
    }
}
