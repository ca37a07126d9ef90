//! The conversion result handed back to callers.

use super::ImageInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of converting one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Whether conversion succeeded
    pub success: bool,

    /// Markdown output (empty on failure)
    pub markdown: String,

    /// Stored images in discovery order
    pub images: Vec<ImageInfo>,

    /// Format label, e.g. "docx" or "doc (converted from docx)"
    pub file_type: String,

    /// Human readable error on failure
    pub error: Option<String>,

    /// Format-specific facts (name, size, pages, sheets, ...)
    pub file_info: BTreeMap<String, Value>,
}

impl ParseResult {
    /// Create a successful result.
    pub fn success(
        markdown: impl Into<String>,
        images: Vec<ImageInfo>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            markdown: markdown.into(),
            images,
            file_type: file_type.into(),
            error: None,
            file_info: BTreeMap::new(),
        }
    }

    /// Create a failure result.
    pub fn failure(error: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            success: false,
            markdown: String::new(),
            images: Vec::new(),
            file_type: file_type.into(),
            error: Some(error.into()),
            file_info: BTreeMap::new(),
        }
    }

    /// Add a `file_info` entry.
    pub fn with_info(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.file_info.insert(key.to_string(), value.into());
        self
    }

    /// Number of stored images.
    pub fn images_count(&self) -> usize {
        self.images.len()
    }

    /// Look up a `file_info` entry.
    pub fn info(&self, key: &str) -> Option<&Value> {
        self.file_info.get(key)
    }
}
