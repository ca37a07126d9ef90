//! Document conversion engine.
//!
//! [`OfficeParser`] detects the input format, opens the file through a
//! registered [`DocumentReader`](crate::source::DocumentReader), and runs the
//! pipeline for the document's layout family:
//!
//! - paged: table detection, content ordering and images per page
//! - flow: header/footer filtering, paragraph classification, inline tables
//! - workbook: one grid per sheet with date-aware cell text
//! - slides: text shapes and pictures per slide
//!
//! # Example
//!
//! ```no_run
//! use unoffice::convert::{OfficeParser, ParserOptions};
//!
//! let parser = OfficeParser::new(ParserOptions::default());
//! let result = parser.parse("report.layout.json");
//! if result.success {
//!     println!("{}", result.markdown);
//! } else {
//!     eprintln!("{}", result.error.unwrap_or_default());
//! }
//! ```

mod flow;
mod legacy;
mod options;
mod paged;
mod slides;
mod workbook;

pub use legacy::{find_libreoffice, ConvertedDocument, LegacyConverter};
pub use options::{ParserOptions, DEFAULT_CONVERSION_TIMEOUT};
pub use workbook::{cell_text, format_datetime, serial_to_datetime};

use crate::detect::{detect_format_from_path, sniff_container_from_path, FileFormat};
use crate::error::{Error, Result};
use crate::model::ParseResult;
use crate::render::MarkdownAssembler;
use crate::source::{OpenedDocument, ReaderRegistry, SourceDocument};
use crate::storage::{DirectoryStore, ImageSink, ImageStore, ImageValidator};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// `file_type` reported for converted legacy Word documents.
pub const CONVERTED_DOC_FILE_TYPE: &str = "doc (converted from docx)";

/// Per-document state shared by the format pipelines.
pub(crate) struct Pipeline<'a> {
    pub options: &'a ParserOptions,
    pub sink: ImageSink<'a>,
    pub out: MarkdownAssembler,
    info: BTreeMap<String, Value>,
}

impl Pipeline<'_> {
    /// Record a `file_info` entry.
    pub fn info(&mut self, key: &str, value: impl Into<Value>) {
        self.info.insert(key.to_string(), value.into());
    }
}

/// Converts office documents to Markdown.
///
/// One parser may be reused for any number of documents; nothing is
/// carried over between calls.
pub struct OfficeParser {
    options: ParserOptions,
    registry: ReaderRegistry,
    store: Box<dyn ImageStore>,
    validator: ImageValidator,
}

impl OfficeParser {
    /// Create a parser with the default reader registry and a directory
    /// image store built from `options`.
    pub fn new(options: ParserOptions) -> Self {
        let store = DirectoryStore::new(options.image_dir.clone(), options.image_base_url.as_str());
        let validator = ImageValidator::new(options.min_image_bytes, options.min_image_dimension);
        Self {
            options,
            registry: ReaderRegistry::with_defaults(),
            store: Box::new(store),
            validator,
        }
    }

    /// Replace the reader registry.
    pub fn with_registry(mut self, registry: ReaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the image store.
    pub fn with_store(mut self, store: Box<dyn ImageStore>) -> Self {
        self.store = store;
        self
    }

    /// Conversion options.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Registered readers.
    pub fn registry(&self) -> &ReaderRegistry {
        &self.registry
    }

    /// Mutable access to the registered readers.
    pub fn registry_mut(&mut self) -> &mut ReaderRegistry {
        &mut self.registry
    }

    /// Convert a file, reporting failures inside the result.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> ParseResult {
        let path = path.as_ref();
        match self.try_parse(path) {
            Ok(result) => result,
            Err(e) => {
                log::error!("Document parsing failed for {}: {}", path.display(), e);
                failure_result(path, &e)
            }
        }
    }

    /// Convert a file.
    ///
    /// # Errors
    ///
    /// Returns the document-level error: missing input, unsupported format,
    /// missing reader or converter, conversion tool failure, or a reader
    /// failure that is not confined to a single page, table or slide.
    pub fn try_parse<P: AsRef<Path>>(&self, path: P) -> Result<ParseResult> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }

        let name = file_name(path);
        let size = std::fs::metadata(path)?.len();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let format = match detect_format_from_path(path) {
            Ok(format) => Some(format),
            // Readers may claim extensions beyond the office formats
            Err(_) if self.registry.supports(&extension) => None,
            Err(e) => return Err(e),
        };
        log::info!("Parsing {} ({} bytes)", name, size);

        if let Some(format) = format {
            check_container(path, format);
        }

        let result = if format == Some(FileFormat::Doc) {
            self.parse_legacy(path)?
        } else {
            let opened = self.registry.open(path)?;
            if let Some(format) = format.filter(|f| *f != opened.format) {
                log::warn!("{} was read as {} instead of {}", name, opened.format, format);
            }
            self.render(opened)?
        };

        Ok(result.with_info("name", name).with_info("size", size))
    }

    fn parse_legacy(&self, path: &Path) -> Result<ParseResult> {
        if !self.options.enable_doc_conversion {
            return Err(Error::DependencyMissing(
                "DOC conversion is disabled; convert the file to .docx first".into(),
            ));
        }

        let converter = LegacyConverter::new(
            self.options.libreoffice_path.as_deref(),
            self.options.conversion_timeout,
        );
        let converted = converter.convert(path)?;
        let opened = self.registry.open(converted.path())?;

        let mut result = self.render(opened)?;
        result.file_type = CONVERTED_DOC_FILE_TYPE.to_string();
        Ok(result
            .with_info("original_format", "doc")
            .with_info("converted_from", converted.path().display().to_string()))
    }

    fn render(&self, opened: OpenedDocument) -> Result<ParseResult> {
        let format = opened.format;
        let mut pipeline = Pipeline {
            options: &self.options,
            sink: ImageSink::new(&self.validator, self.store.as_ref()),
            out: MarkdownAssembler::new().with_normalization(self.options.normalize_unicode),
            info: BTreeMap::new(),
        };

        log::debug!("Rendering {} document as {}", opened.source.kind(), format);
        match opened.source {
            SourceDocument::Paged(mut source) => paged::run(source.as_mut(), &mut pipeline)?,
            SourceDocument::Flow(mut source) => flow::run(source.as_mut(), &mut pipeline)?,
            SourceDocument::Workbook(mut source) => workbook::run(source.as_mut(), &mut pipeline)?,
            SourceDocument::Slides(mut source) => slides::run(source.as_mut(), &mut pipeline)?,
        }

        let Pipeline { sink, out, info, .. } = pipeline;
        let mut result = ParseResult::success(out.finish(), sink.into_images(), format.as_str());
        result.file_info.extend(info);
        Ok(result)
    }
}

impl Default for OfficeParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

fn failure_result(path: &Path, error: &Error) -> ParseResult {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "unknown".to_string());

    let mut result = ParseResult::failure(error.to_string(), format.as_str())
        .with_info("name", file_name(path))
        .with_info("format", format.as_str());
    if let Ok(meta) = std::fs::metadata(path) {
        result = result.with_info("size", meta.len());
    }
    result
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_container(path: &Path, format: FileFormat) {
    match sniff_container_from_path(path) {
        Ok(Some(found)) if found != format.expected_container() => log::warn!(
            "{} has a .{} extension but looks like {}",
            path.display(),
            format,
            found
        ),
        Ok(_) => {}
        Err(e) => log::debug!("Container check skipped: {}", e),
    }
}
