//! Input format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Document formats the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Word 2007+ (flow layout)
    Docx,
    /// Legacy Word binary, converted to DOCX before parsing
    Doc,
    /// PDF (paged layout)
    Pdf,
    /// Excel 2007+
    Xlsx,
    /// Legacy Excel binary
    Xls,
    /// PowerPoint 2007+
    Pptx,
    /// Legacy PowerPoint binary (rejected)
    Ppt,
}

impl FileFormat {
    /// Extensions accepted for conversion, in display order.
    pub const SUPPORTED: &'static [&'static str] = &["docx", "doc", "pdf", "xlsx", "xls", "pptx"];

    /// Map a lowercase or mixed-case extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(FileFormat::Docx),
            "doc" => Some(FileFormat::Doc),
            "pdf" => Some(FileFormat::Pdf),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            "pptx" => Some(FileFormat::Pptx),
            "ppt" => Some(FileFormat::Ppt),
            _ => None,
        }
    }

    /// Label used as `file_type` in results.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Docx => "docx",
            FileFormat::Doc => "doc",
            FileFormat::Pdf => "pdf",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Pptx => "pptx",
            FileFormat::Ppt => "ppt",
        }
    }

    /// Container the format is normally stored in.
    pub fn expected_container(&self) -> Container {
        match self {
            FileFormat::Docx | FileFormat::Xlsx | FileFormat::Pptx => Container::Zip,
            FileFormat::Doc | FileFormat::Xls | FileFormat::Ppt => Container::Cfb,
            FileFormat::Pdf => Container::Pdf,
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical container recognized from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// ZIP archive (Office Open XML)
    Zip,
    /// OLE2 compound file (legacy Office)
    Cfb,
    /// PDF
    Pdf,
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Container::Zip => write!(f, "ZIP (Office Open XML)"),
            Container::Cfb => write!(f, "OLE2 compound file"),
            Container::Pdf => write!(f, "PDF"),
        }
    }
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const CFB_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Detect the format of a path from its extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for `.ppt` and unknown extensions.
///
/// # Example
/// ```
/// use unoffice::detect::{detect_format_from_path, FileFormat};
///
/// assert_eq!(detect_format_from_path("Report.DOCX").unwrap(), FileFormat::Docx);
/// assert!(detect_format_from_path("slides.ppt").is_err());
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<FileFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match FileFormat::from_extension(&ext) {
        Some(FileFormat::Ppt) => Err(Error::UnsupportedFormat(
            "The .ppt format is not supported. Please convert the file to .pptx format".into(),
        )),
        Some(format) => Ok(format),
        None => Err(Error::UnsupportedFormat(format!(
            "Unsupported file format: .{}. Supported formats: {}",
            ext,
            FileFormat::SUPPORTED.join(", ")
        ))),
    }
}

/// Recognize the container from leading bytes.
pub fn sniff_container(data: &[u8]) -> Option<Container> {
    if data.starts_with(ZIP_MAGIC) {
        Some(Container::Zip)
    } else if data.starts_with(CFB_MAGIC) {
        Some(Container::Cfb)
    } else if data.starts_with(PDF_MAGIC) {
        Some(Container::Pdf)
    } else {
        None
    }
}

/// Recognize the container of a file from its first bytes.
pub fn sniff_container_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Container>> {
    let mut header = Vec::with_capacity(8);
    File::open(path)?.take(8).read_to_end(&mut header)?;
    Ok(sniff_container(&header))
}
