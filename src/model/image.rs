//! Image payloads and the records describing stored images.

use serde::{Deserialize, Serialize};

/// An image payload handed over by a reader, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawImage {
    /// Raw encoded bytes
    #[serde(default)]
    pub data: Vec<u8>,

    /// Pixel width, when the reader knows it
    #[serde(default)]
    pub width: Option<u32>,

    /// Pixel height, when the reader knows it
    #[serde(default)]
    pub height: Option<u32>,

    /// Color components excluding alpha (4 = CMYK)
    #[serde(default)]
    pub components: Option<u8>,

    /// Relationship id used by flow paragraphs to reference the image
    #[serde(default)]
    pub rel_id: Option<String>,

    /// Sheet the image is anchored to (spreadsheets)
    #[serde(default)]
    pub sheet: Option<String>,

    /// Name of the part inside the container (e.g. "xl/media/image1.png")
    #[serde(default)]
    pub source_name: Option<String>,
}

impl RawImage {
    /// Create an image from bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set color component count.
    pub fn with_components(mut self, components: u8) -> Self {
        self.components = Some(components);
        self
    }

    /// Set relationship id.
    pub fn with_rel_id(mut self, rel_id: impl Into<String>) -> Self {
        self.rel_id = Some(rel_id.into());
        self
    }

    /// Set sheet anchor.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Set container part name.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Encoded image format, recognized from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG
    Png,
    /// JPEG
    Jpeg,
    /// GIF
    Gif,
    /// BMP
    Bmp,
    /// WebP
    Webp,
    /// TIFF
    Tiff,
}

impl ImageFormat {
    /// Detect format from data magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }

        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(ImageFormat::Tiff);
        }

        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::Webp);
        }

        None
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Webp => "webp",
            ImageFormat::Tiff => "tiff",
        }
    }
}

/// A stored image as reported in the conversion result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Generated file name (`{uuid}.{ext}`)
    pub filename: String,
    /// Public URL
    pub url: String,
    /// Size in bytes
    pub size: usize,
    /// Extension used for the stored file
    pub format: String,
}
