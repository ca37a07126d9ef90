//! Slide deck model.

use super::RawImage;
use serde::{Deserialize, Serialize};

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SlideShape {
    /// A shape carrying a text frame
    Text(String),
    /// A picture shape
    Picture(RawImage),
    /// A picture whose payload could not be read
    BrokenPicture(String),
}

/// One slide, shapes in z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Shapes on the slide
    #[serde(default)]
    pub shapes: Vec<SlideShape>,
}

impl Slide {
    /// Create a slide from shapes.
    pub fn new(shapes: Vec<SlideShape>) -> Self {
        Self { shapes }
    }
}
