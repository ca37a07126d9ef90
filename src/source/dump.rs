//! JSON layout dumps.
//!
//! A layout dump is the already extracted content of one document, written
//! by an external reader:
//!
//! ```json
//! { "format": "pdf", "kind": "paged", "pages": [ ... ] }
//! ```
//!
//! `kind` selects the layout family (`paged`, `flow`, `workbook`, `slides`)
//! and `format` the original document format label.

use super::{
    DocumentReader, MemoryFlow, MemoryPaged, MemorySlides, MemoryWorkbook, OpenedDocument,
    SourceDocument,
};
use crate::detect::FileFormat;
use crate::error::{Error, Result};
use crate::model::{DateSystem, FlowElement, PageLayout, RawImage, Sheet, Slide};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A serialized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDump {
    /// Original format label (e.g. "pdf", "docx")
    pub format: String,

    /// Extracted content
    #[serde(flatten)]
    pub content: DumpContent,
}

/// Content of a layout dump, by layout family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DumpContent {
    /// Pages with positioned blocks
    Paged {
        /// Pages in order
        #[serde(default)]
        pages: Vec<PageLayout>,
    },
    /// Flow body
    Flow {
        /// Body elements
        #[serde(default)]
        body: Vec<FlowElement>,
        /// Table matrices referenced by index
        #[serde(default)]
        tables: Vec<Vec<Vec<String>>>,
        /// Embedded images
        #[serde(default)]
        images: Vec<RawImage>,
    },
    /// Workbook sheets
    Workbook {
        /// Date system
        #[serde(default)]
        date_system: DateSystem,
        /// Sheets
        #[serde(default)]
        sheets: Vec<Sheet>,
        /// Embedded images
        #[serde(default)]
        images: Vec<RawImage>,
    },
    /// Slide deck
    Slides {
        /// Slides
        #[serde(default)]
        slides: Vec<Slide>,
    },
}

impl LayoutDump {
    /// Parse a dump from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Turn the dump into an opened document.
    pub fn into_document(self) -> Result<OpenedDocument> {
        let format = FileFormat::from_extension(&self.format).ok_or_else(|| {
            Error::UnsupportedFormat(format!("Unknown layout dump format: {}", self.format))
        })?;

        let source = match self.content {
            DumpContent::Paged { pages } => SourceDocument::Paged(Box::new(MemoryPaged::new(pages))),
            DumpContent::Flow {
                body,
                tables,
                images,
            } => SourceDocument::Flow(Box::new(MemoryFlow::new(body, tables).with_images(images))),
            DumpContent::Workbook {
                date_system,
                sheets,
                images,
            } => SourceDocument::Workbook(Box::new(
                MemoryWorkbook::new(sheets)
                    .with_date_system(date_system)
                    .with_images(images),
            )),
            DumpContent::Slides { slides } => {
                SourceDocument::Slides(Box::new(MemorySlides::new(slides)))
            }
        };

        Ok(OpenedDocument::new(format, source))
    }
}

/// Reads `*.json` layout dumps.
#[derive(Debug, Clone, Default)]
pub struct LayoutDumpReader;

impl LayoutDumpReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for LayoutDumpReader {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "layout-dump"
    }

    fn open(&self, path: &Path) -> Result<OpenedDocument> {
        let reader = BufReader::new(File::open(path)?);
        let dump: LayoutDump = serde_json::from_reader(reader)?;
        log::debug!(
            "LayoutDumpReader: {} as {} ({})",
            path.display(),
            dump.format,
            dump.content.kind()
        );
        dump.into_document()
    }
}

impl DumpContent {
    /// Layout family name.
    pub fn kind(&self) -> &'static str {
        match self {
            DumpContent::Paged { .. } => "paged",
            DumpContent::Flow { .. } => "flow",
            DumpContent::Workbook { .. } => "workbook",
            DumpContent::Slides { .. } => "slides",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_dump() {
        let json = r#"{
            "format": "pdf",
            "kind": "paged",
            "pages": [
                {"number": 1, "blocks": [
                    {"type": "text", "bbox": [0, 0, 100, 10], "lines": [{"text": "Hi", "bbox": [0, 0, 20, 10]}]}
                ]}
            ]
        }"#;
        let doc = LayoutDump::from_json(json).unwrap().into_document().unwrap();
        assert_eq!(doc.format, FileFormat::Pdf);
        match doc.source {
            SourceDocument::Paged(mut src) => {
                assert_eq!(src.page_count(), 1);
                assert_eq!(src.load_page(0).unwrap().blocks.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_workbook_dump_defaults() {
        let json = r#"{"format": "xlsx", "kind": "workbook", "sheets": [{"name": "S"}]}"#;
        let dump = LayoutDump::from_json(json).unwrap();
        assert_eq!(dump.content.kind(), "workbook");
        let doc = dump.into_document().unwrap();
        assert_eq!(doc.source.kind(), "workbook");
    }

    #[test]
    fn test_unknown_format() {
        let json = r#"{"format": "odt", "kind": "slides"}"#;
        let err = LayoutDump::from_json(json).unwrap().into_document().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_reader_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(
            &path,
            r#"{"format": "pptx", "kind": "slides", "slides": [{"shapes": [{"type": "text", "value": "Hello"}]}]}"#,
        )
        .unwrap();

        let doc = LayoutDumpReader::new().open(&path).unwrap();
        assert_eq!(doc.format, FileFormat::Pptx);
        assert_eq!(doc.source.kind(), "slides");
    }

    #[test]
    fn test_malformed_dump() {
        assert!(matches!(
            LayoutDump::from_json("{\"format\": \"pdf\"}"),
            Err(Error::Json(_))
        ));
    }
}
