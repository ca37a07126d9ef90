//! # unoffice
//!
//! Office document to Markdown conversion with layout reconstruction.
//!
//! Readers hand over positioned text, flow paragraphs, typed cells or
//! slide shapes. This crate rebuilds reading order, infers tables from
//! spatial alignment, classifies headings and lists, drops running headers
//! and footers, stores embedded images, and assembles clean Markdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoffice::convert_file;
//!
//! let result = convert_file("report.layout.json");
//! if result.success {
//!     println!("{}", result.markdown);
//! }
//! ```
//!
//! ## Features
//!
//! - **Table inference**: column grids recovered from span positions
//! - **Reading order**: text, tables and images merged top to bottom
//! - **Structure**: headings, emphasis, ordered and bullet lists
//! - **Noise removal**: page numbers, running headers, legal footers
//! - **Spreadsheets**: date-aware cell text for both date systems
//! - **Legacy Word**: `.doc` converted through headless LibreOffice
//! - **Pluggable readers**: one trait per layout family

pub mod convert;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;
pub mod storage;

// Re-export commonly used types
pub use convert::{OfficeParser, ParserOptions};
pub use detect::{detect_format_from_path, sniff_container, Container, FileFormat};
pub use error::{Error, Result};
pub use layout::{
    ContentOrderer, HeaderFooterFilter, ParagraphClassifier, TableDetector, TableDetectorConfig,
};
pub use model::{ContentBlock, ImageInfo, ParseResult, Table};
pub use render::{to_json, JsonFormat, MarkdownAssembler, TableRenderer};
pub use source::{DocumentReader, OpenedDocument, ReaderRegistry, SourceDocument};
pub use storage::{DirectoryStore, ImageStore};

use std::path::Path;

/// Convert a document with default options.
///
/// Failures are reported in the returned result rather than as an error.
///
/// # Example
///
/// ```no_run
/// use unoffice::convert_file;
///
/// let result = convert_file("notes.layout.json");
/// println!("{} images", result.images_count());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> ParseResult {
    OfficeParser::default().parse(path)
}

/// Convert a document with custom options.
///
/// # Example
///
/// ```no_run
/// use unoffice::{convert_file_with_options, ParserOptions};
///
/// let options = ParserOptions::new()
///     .with_image_base_url("https://cdn.example.com")
///     .with_header_footer_filter(false);
/// let result = convert_file_with_options("notes.layout.json", options);
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(path: P, options: ParserOptions) -> ParseResult {
    OfficeParser::new(options).parse(path)
}

/// Convert a document and return its Markdown, or the document-level error.
///
/// # Example
///
/// ```no_run
/// let markdown = unoffice::to_markdown("notes.layout.json").unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(OfficeParser::default().try_parse(path)?.markdown)
}
