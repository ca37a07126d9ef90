//! Flow-layout paragraph types.

use serde::{Deserialize, Serialize};

/// A paragraph as delivered by a flow-layout reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowParagraph {
    /// Paragraph text (runs concatenated)
    pub text: String,

    /// Style name (e.g. "Heading 2", "Title", "Normal")
    #[serde(default)]
    pub style_name: Option<String>,

    /// Paragraph alignment
    #[serde(default)]
    pub alignment: Alignment,

    /// Relationship ids of images drawn inside the paragraph
    #[serde(default)]
    pub image_refs: Vec<String>,
}

impl FlowParagraph {
    /// Create a plain paragraph.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the style name.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style_name = Some(style.into());
        self
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Attach an inline image reference.
    pub fn with_image(mut self, rel_id: impl Into<String>) -> Self {
        self.image_refs.push(rel_id.into());
        self
    }

    /// Trimmed text.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// An element of a flow document body, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FlowElement {
    /// A paragraph
    Paragraph(FlowParagraph),
    /// The n-th table of the document (0-indexed)
    Table(usize),
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left-aligned (default)
    #[default]
    Left,
    /// Center-aligned
    Center,
    /// Right-aligned
    Right,
    /// Justified
    Justify,
}

/// Semantic role assigned to a flow paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRole {
    /// Heading of the given level (1-6)
    Heading(u8),
    /// Emphasized (bold) paragraph
    Emphasis,
    /// Ordered list item
    OrderedItem,
    /// Unordered list item
    BulletItem,
    /// Plain paragraph
    Plain,
}
