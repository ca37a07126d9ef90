//! In-memory sources backed by already extracted content.

use super::{FlowSource, PagedSource, SlideSource, WorkbookSource};
use crate::error::{Error, Result};
use crate::model::{DateSystem, FlowElement, PageLayout, RawImage, Sheet, Slide};

/// Pages held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPaged {
    pages: Vec<PageLayout>,
}

impl MemoryPaged {
    /// Create a source from pages.
    pub fn new(pages: Vec<PageLayout>) -> Self {
        Self { pages }
    }
}

impl PagedSource for MemoryPaged {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn load_page(&mut self, index: usize) -> Result<PageLayout> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| Error::unit(format!("page {}", index + 1), "index out of range"))
    }
}

/// A flow body with its tables and images held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlow {
    body: Vec<FlowElement>,
    tables: Vec<Vec<Vec<String>>>,
    images: Vec<RawImage>,
}

impl MemoryFlow {
    /// Create a source from body elements and table matrices.
    pub fn new(body: Vec<FlowElement>, tables: Vec<Vec<Vec<String>>>) -> Self {
        Self {
            body,
            tables,
            images: Vec::new(),
        }
    }

    /// Attach embedded images.
    pub fn with_images(mut self, images: Vec<RawImage>) -> Self {
        self.images = images;
        self
    }
}

impl FlowSource for MemoryFlow {
    fn body(&mut self) -> Result<Vec<FlowElement>> {
        Ok(self.body.clone())
    }

    fn table(&mut self, index: usize) -> Result<Vec<Vec<String>>> {
        self.tables
            .get(index)
            .cloned()
            .ok_or_else(|| Error::unit(format!("table {}", index + 1), "index out of range"))
    }

    fn images(&mut self) -> Result<Vec<RawImage>> {
        Ok(self.images.clone())
    }
}

/// Sheets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    date_system: DateSystem,
    sheets: Vec<Sheet>,
    images: Vec<RawImage>,
}

impl MemoryWorkbook {
    /// Create a workbook from sheets.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self {
            sheets,
            ..Default::default()
        }
    }

    /// Set the date system.
    pub fn with_date_system(mut self, date_system: DateSystem) -> Self {
        self.date_system = date_system;
        self
    }

    /// Attach embedded images.
    pub fn with_images(mut self, images: Vec<RawImage>) -> Self {
        self.images = images;
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn date_system(&self) -> DateSystem {
        self.date_system
    }

    fn sheets(&mut self) -> Result<Vec<Sheet>> {
        Ok(self.sheets.clone())
    }

    fn images(&mut self) -> Result<Vec<RawImage>> {
        Ok(self.images.clone())
    }
}

/// Slides held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySlides {
    slides: Vec<Slide>,
}

impl MemorySlides {
    /// Create a deck from slides.
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }
}

impl SlideSource for MemorySlides {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn load_slide(&mut self, index: usize) -> Result<Slide> {
        self.slides
            .get(index)
            .cloned()
            .ok_or_else(|| Error::unit(format!("slide {}", index + 1), "index out of range"))
    }
}
