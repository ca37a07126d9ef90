//! Engine configuration.

use crate::layout::TableDetectorConfig;
use crate::storage::{DEFAULT_BASE_URL, DEFAULT_IMAGE_DIR};
use std::path::PathBuf;
use std::time::Duration;

/// Default limit for the legacy document conversion step.
pub const DEFAULT_CONVERSION_TIMEOUT: Duration = Duration::from_secs(60);

/// Options controlling document conversion.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Base URL prefixed to stored image links
    pub image_base_url: String,

    /// Directory stored images are written to
    pub image_dir: PathBuf,

    /// Drop running headers, footers and page numbers (flow documents)
    pub filter_headers_footers: bool,

    /// Convert legacy `.doc` files through LibreOffice
    pub enable_doc_conversion: bool,

    /// Explicit LibreOffice executable
    pub libreoffice_path: Option<PathBuf>,

    /// Time limit for the conversion process
    pub conversion_timeout: Duration,

    /// Images smaller than this many bytes are skipped
    pub min_image_bytes: usize,

    /// Images narrower or shorter than this are skipped (paged documents)
    pub min_image_dimension: u32,

    /// Apply Unicode NFC normalization to the output
    pub normalize_unicode: bool,

    /// Table detection thresholds
    pub detector: TableDetectorConfig,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_BASE_URL.to_string(),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            filter_headers_footers: true,
            enable_doc_conversion: true,
            libreoffice_path: None,
            conversion_timeout: DEFAULT_CONVERSION_TIMEOUT,
            min_image_bytes: 100,
            min_image_dimension: 50,
            normalize_unicode: true,
            detector: TableDetectorConfig::default(),
        }
    }
}

impl ParserOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image base URL.
    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Enable or disable header/footer filtering.
    pub fn with_header_footer_filter(mut self, enabled: bool) -> Self {
        self.filter_headers_footers = enabled;
        self
    }

    /// Enable or disable legacy `.doc` conversion.
    pub fn with_doc_conversion(mut self, enabled: bool) -> Self {
        self.enable_doc_conversion = enabled;
        self
    }

    /// Use a specific LibreOffice executable.
    pub fn with_libreoffice_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.libreoffice_path = Some(path.into());
        self
    }

    /// Set the conversion timeout.
    pub fn with_conversion_timeout(mut self, timeout: Duration) -> Self {
        self.conversion_timeout = timeout;
        self
    }

    /// Set image size thresholds.
    pub fn with_image_limits(mut self, min_bytes: usize, min_dimension: u32) -> Self {
        self.min_image_bytes = min_bytes;
        self.min_image_dimension = min_dimension;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Set table detection thresholds.
    pub fn with_detector(mut self, detector: TableDetectorConfig) -> Self {
        self.detector = detector;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.image_base_url, "http://localhost:5000");
        assert_eq!(options.image_dir, PathBuf::from("./static/images"));
        assert!(options.filter_headers_footers);
        assert!(options.enable_doc_conversion);
        assert!(options.libreoffice_path.is_none());
        assert_eq!(options.conversion_timeout, Duration::from_secs(60));
        assert_eq!(options.min_image_bytes, 100);
        assert_eq!(options.min_image_dimension, 50);
        assert!(options.normalize_unicode);
        assert_eq!(options.detector.min_lines, 3);
    }

    #[test]
    fn test_builder() {
        let options = ParserOptions::new()
            .with_image_base_url("https://cdn.example.com")
            .with_image_dir("/tmp/img")
            .with_header_footer_filter(false)
            .with_doc_conversion(false)
            .with_libreoffice_path("/opt/lo/soffice")
            .with_conversion_timeout(Duration::from_secs(5))
            .with_image_limits(10, 0)
            .with_unicode_normalization(false);

        assert_eq!(options.image_base_url, "https://cdn.example.com");
        assert!(!options.filter_headers_footers);
        assert!(!options.enable_doc_conversion);
        assert_eq!(options.libreoffice_path, Some(PathBuf::from("/opt/lo/soffice")));
        assert_eq!(options.conversion_timeout, Duration::from_secs(5));
        assert_eq!(options.min_image_bytes, 10);
        assert!(!options.normalize_unicode);
    }
}
