//! Error types for unoffice library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unoffice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file does not exist.
    #[error("File does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    /// The file format is not handled.
    #[error("{0}")]
    UnsupportedFormat(String),

    /// A required collaborator (reader, converter binary) is absent.
    #[error("Missing dependency: {0}")]
    DependencyMissing(String),

    /// The external conversion tool failed or timed out.
    #[error("DOC conversion failed: {0}")]
    ExternalToolFailure(String),

    /// A single page, sheet, slide or table could not be read.
    #[error("Failed to parse {unit}: {message}")]
    UnitParse {
        /// Human readable unit label, e.g. "page 3"
        unit: String,
        /// Underlying reason
        message: String,
    },

    /// The document as a whole could not be read.
    #[error("Document parsing failed: {0}")]
    DocumentParse(String),

    /// An image payload was rejected or could not be stored.
    #[error("Image error: {0}")]
    Image(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a unit-level parse error.
    pub fn unit(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Error::UnitParse {
            unit: unit.into(),
            message: message.into(),
        }
    }

    /// Whether this error only affects one unit of the document.
    ///
    /// Recoverable errors are replaced with a placeholder in the output;
    /// everything else aborts the document.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnitParse { .. } | Error::Image(_))
    }
}
