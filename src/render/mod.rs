//! Rendering module for turning ordered content into Markdown and JSON.

mod json;
mod markdown;
mod table;

pub use json::{to_json, JsonFormat};
pub use markdown::{image_markdown, MarkdownAssembler, EMPTY_DOCUMENT_PLACEHOLDER};
pub use table::{clean_cell, column_label, HeaderPolicy, TableRenderConfig, TableRenderer};
