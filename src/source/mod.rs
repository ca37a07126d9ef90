//! Reader-facing interfaces.
//!
//! Binary format readers are pluggable. A reader opens a file and exposes it
//! through exactly one of four capability traits, one per layout family.
//! The engine only ever sees these traits, so the reconstruction logic is
//! independent of how spans, paragraphs, cells or shapes were extracted.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use unoffice::source::{LayoutDumpReader, ReaderRegistry};
//!
//! let mut registry = ReaderRegistry::new();
//! registry.register(Arc::new(LayoutDumpReader::new()));
//! assert!(registry.supports("json"));
//! ```

mod dump;
mod memory;

pub use dump::{DumpContent, LayoutDump, LayoutDumpReader};
pub use memory::{MemoryFlow, MemoryPaged, MemorySlides, MemoryWorkbook};

use crate::detect::FileFormat;
use crate::error::{Error, Result};
use crate::model::{DateSystem, FlowElement, PageLayout, RawImage, Sheet, Slide};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Fixed-layout documents (PDF): positioned text and pictures per page.
pub trait PagedSource: Send {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Load one page (0-indexed).
    fn load_page(&mut self, index: usize) -> Result<PageLayout>;
}

/// Flow-layout documents (DOCX): body elements in reading order.
pub trait FlowSource: Send {
    /// Body elements in document order.
    fn body(&mut self) -> Result<Vec<FlowElement>>;

    /// Cell matrix of the table referenced by [`FlowElement::Table`].
    fn table(&mut self, index: usize) -> Result<Vec<Vec<String>>>;

    /// All embedded images, keyed by relationship id.
    fn images(&mut self) -> Result<Vec<RawImage>>;
}

/// Workbooks (XLSX/XLS): typed cell grids per sheet.
pub trait WorkbookSource: Send {
    /// Date system used for serial dates.
    fn date_system(&self) -> DateSystem;

    /// Sheets in workbook order.
    fn sheets(&mut self) -> Result<Vec<Sheet>>;

    /// Embedded images, optionally anchored to a sheet.
    fn images(&mut self) -> Result<Vec<RawImage>>;
}

/// Slide decks (PPTX).
pub trait SlideSource: Send {
    /// Number of slides.
    fn slide_count(&self) -> usize;

    /// Load one slide (0-indexed).
    fn load_slide(&mut self, index: usize) -> Result<Slide>;
}

/// An opened document, by layout family.
pub enum SourceDocument {
    /// Paged layout
    Paged(Box<dyn PagedSource>),
    /// Flow layout
    Flow(Box<dyn FlowSource>),
    /// Workbook
    Workbook(Box<dyn WorkbookSource>),
    /// Slide deck
    Slides(Box<dyn SlideSource>),
}

impl SourceDocument {
    /// Layout family name.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceDocument::Paged(_) => "paged",
            SourceDocument::Flow(_) => "flow",
            SourceDocument::Workbook(_) => "workbook",
            SourceDocument::Slides(_) => "slides",
        }
    }
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SourceDocument").field(&self.kind()).finish()
    }
}

/// A document returned by a reader.
#[derive(Debug)]
pub struct OpenedDocument {
    /// Format the content was read as
    pub format: FileFormat,
    /// Content access
    pub source: SourceDocument,
}

impl OpenedDocument {
    /// Create an opened document.
    pub fn new(format: FileFormat, source: SourceDocument) -> Self {
        Self { format, source }
    }
}

/// Trait for document readers.
///
/// Implement this trait to plug a binary format reader into the engine.
pub trait DocumentReader: Send + Sync {
    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this reader.
    fn name(&self) -> &str;

    /// Open a file.
    fn open(&self, path: &Path) -> Result<OpenedDocument>;

    /// Check if this reader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry mapping file extensions to readers.
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn DocumentReader>>,
    by_name: HashMap<String, Arc<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in layout dump reader.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LayoutDumpReader::new()));
        registry
    }

    /// Register a reader for all its supported extensions.
    ///
    /// A later registration for the same extension replaces the earlier one.
    pub fn register(&mut self, reader: Arc<dyn DocumentReader>) {
        for ext in reader.supported_extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
        self.by_name.insert(reader.name().to_lowercase(), reader);
    }

    /// Get a reader by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentReader>> {
        self.readers.get(&ext.to_lowercase()).cloned()
    }

    /// Get a reader by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentReader>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_lowercase())
    }

    /// All supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.readers.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Open a file with the reader registered for its extension.
    pub fn open(&self, path: &Path) -> Result<OpenedDocument> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Other("File has no extension".into()))?;

        let reader = self.get_by_extension(ext).ok_or_else(|| {
            Error::DependencyMissing(format!("no reader registered for .{} files", ext))
        })?;

        log::debug!("Opening {} with reader '{}'", path.display(), reader.name());
        reader.open(path)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
