//! Layout model shared by readers, the layout stage and the renderers.
//!
//! Readers produce positioned primitives ([`PageLayout`]), flow paragraphs
//! ([`FlowParagraph`]), typed sheets ([`Sheet`]) or slides ([`Slide`]).
//! The layout stage turns them into ordered [`ContentBlock`]s, which the
//! renderers linearize into a [`ParseResult`].

mod content;
mod geometry;
mod image;
mod page;
mod paragraph;
mod result;
mod sheet;
mod slide;
mod table;

pub use content::{ContentBlock, ContentKind, SortKey};
pub use geometry::BBox;
pub use image::{ImageFormat, ImageInfo, RawImage};
pub use page::{LayoutBlock, NativeTable, PageLayout, Span, TextLine};
pub use paragraph::{Alignment, FlowElement, FlowParagraph, ParagraphRole};
pub use result::ParseResult;
pub use sheet::{CellValue, DateSystem, Sheet};
pub use slide::{Slide, SlideShape};
pub use table::{Table, TableOrigin};
