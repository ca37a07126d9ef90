//! Linearizes content into the final Markdown text.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{ContentBlock, ContentKind, ImageInfo};

use super::TableRenderer;

/// Output used when a document produced no visible content.
pub const EMPTY_DOCUMENT_PLACEHOLDER: &str = "*Document content is empty or cannot be parsed*";

/// Accumulates Markdown lines and normalizes them on [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct MarkdownAssembler {
    lines: Vec<String>,
    normalize_unicode: bool,
    blank_runs: Regex,
}

impl Default for MarkdownAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownAssembler {
    /// Create an assembler with Unicode NFC normalization enabled.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            normalize_unicode: true,
            blank_runs: Regex::new(r"\n{3,}").expect("static pattern"),
        }
    }

    /// Enable or disable NFC normalization of the final text.
    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Append one line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append an empty line.
    pub fn push_blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append several lines.
    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// Append a line followed by a blank line.
    pub fn push_paragraph(&mut self, line: impl Into<String>) {
        self.push_line(line);
        self.push_blank();
    }

    /// Append an inline image reference.
    pub fn push_image(&mut self, image: &ImageInfo) {
        self.push_paragraph(image_markdown("Image", &image.url));
    }

    /// Append a content block followed by a blank line.
    pub fn push_block(&mut self, block: &ContentBlock, tables: &TableRenderer) {
        match &block.kind {
            ContentKind::Text(text) => self.push_paragraph(text.as_str()),
            ContentKind::Table(table) => {
                if let Some(lines) = tables.render(table) {
                    self.extend(lines);
                    self.push_blank();
                }
            }
            ContentKind::Image(image) => self.push_image(image),
            ContentKind::Placeholder(marker) => self.push_paragraph(marker.as_str()),
        }
    }

    /// Produce the final text.
    ///
    /// Trailing whitespace is stripped from every line, runs of three or
    /// more newlines collapse to two, and leading/trailing blank lines are
    /// removed. An empty result becomes [`EMPTY_DOCUMENT_PLACEHOLDER`].
    pub fn finish(self) -> String {
        let joined = self
            .lines
            .iter()
            .flat_map(|l| l.split('\n'))
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");

        let collapsed = self.blank_runs.replace_all(&joined, "\n\n");
        let trimmed = collapsed.trim_matches('\n');

        if trimmed.trim().is_empty() {
            return EMPTY_DOCUMENT_PLACEHOLDER.to_string();
        }

        if self.normalize_unicode {
            trimmed.nfc().collect()
        } else {
            trimmed.to_string()
        }
    }
}

/// Markdown image reference.
pub fn image_markdown(alt: &str, url: &str) -> String {
    format!("![{}]({})", alt, url)
}
