//! Image validation and persistence.
//!
//! Accepted images are written under a configured directory with a random
//! file name and exposed as `{base_url}/static/images/{filename}`.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{ImageFormat, ImageInfo, RawImage};

/// URL path segment under which stored images are served.
pub const STATIC_IMAGE_PATH: &str = "static/images";

/// Default base URL for image links.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default directory for stored images.
pub const DEFAULT_IMAGE_DIR: &str = "./static/images";

/// Destination for accepted images.
pub trait ImageStore: Send + Sync {
    /// Persist `data` and describe where it can be fetched.
    fn store(&self, data: &[u8], extension: &str) -> Result<ImageInfo>;
}

/// Stores images as files in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    base_url: String,
}

impl DirectoryStore {
    /// Create a store writing to `dir` and linking under `base_url`.
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Public URL for a stored file name.
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}/{}", self.base_url, STATIC_IMAGE_PATH, filename)
    }
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_DIR, DEFAULT_BASE_URL)
    }
}

impl ImageStore for DirectoryStore {
    fn store(&self, data: &[u8], extension: &str) -> Result<ImageInfo> {
        fs::create_dir_all(&self.dir)?;
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        fs::write(self.dir.join(&filename), data)?;
        log::debug!("DirectoryStore: wrote {} ({} bytes)", filename, data.len());

        Ok(ImageInfo {
            url: self.url_for(&filename),
            filename,
            size: data.len(),
            format: extension.to_string(),
        })
    }
}

/// Whether pixel geometry and color space are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryCheck {
    /// Check dimensions and reject CMYK (paged sources)
    Enforce,
    /// Only size and format are checked
    Skip,
}

/// Rejects payloads that are too small or not a recognizable image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageValidator {
    /// Minimum payload size in bytes
    pub min_bytes: usize,
    /// Minimum width and height in pixels
    pub min_dimension: u32,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self {
            min_bytes: 100,
            min_dimension: 50,
        }
    }
}

impl ImageValidator {
    /// Create a validator.
    pub fn new(min_bytes: usize, min_dimension: u32) -> Self {
        Self {
            min_bytes,
            min_dimension,
        }
    }

    /// Validate an image and return its sniffed format.
    pub fn validate(&self, image: &RawImage, geometry: GeometryCheck) -> Result<ImageFormat> {
        if image.size() < self.min_bytes {
            return Err(Error::Image(format!(
                "payload too small ({} < {} bytes)",
                image.size(),
                self.min_bytes
            )));
        }

        if geometry == GeometryCheck::Enforce {
            if image.components.is_some_and(|n| n >= 4) {
                return Err(Error::Image("CMYK images are not supported".into()));
            }
            let too_small = |d: Option<u32>| d.is_some_and(|d| d < self.min_dimension);
            if too_small(image.width) || too_small(image.height) {
                return Err(Error::Image(format!(
                    "image too small ({}x{})",
                    image.width.unwrap_or(0),
                    image.height.unwrap_or(0)
                )));
            }
        }

        ImageFormat::detect(&image.data)
            .ok_or_else(|| Error::Image("unrecognized image data".into()))
    }
}

/// Validates and stores the images of one document.
pub struct ImageSink<'a> {
    validator: &'a ImageValidator,
    store: &'a dyn ImageStore,
    stored: Vec<ImageInfo>,
}

impl<'a> ImageSink<'a> {
    /// Create a sink.
    pub fn new(validator: &'a ImageValidator, store: &'a dyn ImageStore) -> Self {
        Self {
            validator,
            store,
            stored: Vec::new(),
        }
    }

    /// Validate and store one image.
    ///
    /// Rejections and storage failures are logged and yield `None`.
    pub fn accept(&mut self, image: &RawImage, geometry: GeometryCheck) -> Option<ImageInfo> {
        let format = match self.validator.validate(image, geometry) {
            Ok(format) => format,
            Err(e) => {
                log::debug!("Skipping image {:?}: {}", image.source_name, e);
                return None;
            }
        };

        match self.store.store(&image.data, format.extension()) {
            Ok(info) => {
                self.stored.push(info.clone());
                Some(info)
            }
            Err(e) => {
                log::warn!("Failed to store image: {}", e);
                None
            }
        }
    }

    /// Images stored so far.
    pub fn images(&self) -> &[ImageInfo] {
        &self.stored
    }

    /// Consume the sink and return stored images in order.
    pub fn into_images(self) -> Vec<ImageInfo> {
        self.stored
    }
}
