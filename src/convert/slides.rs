//! Slide deck (PPTX) pipeline.

use super::Pipeline;
use crate::error::Result;
use crate::model::SlideShape;
use crate::render::image_markdown;
use crate::source::SlideSource;
use crate::storage::GeometryCheck;

const NO_TEXT: &str = "*Slide has no text content*";

pub(crate) fn run(source: &mut dyn SlideSource, pipeline: &mut Pipeline<'_>) -> Result<()> {
    let slide_count = source.slide_count();
    log::info!("Presentation contains {} slides", slide_count);

    for index in 0..slide_count {
        let number = index + 1;
        let slide = match source.load_slide(index) {
            Ok(slide) => slide,
            Err(e) if e.is_recoverable() => {
                log::warn!("Slide {} parsing failed: {}", number, e);
                pipeline
                    .out
                    .push_paragraph(format!("*[Slide {} parsing failed]*", number));
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut lines = Vec::new();
        for shape in &slide.shapes {
            match shape {
                SlideShape::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        lines.push(text.to_string());
                    }
                }
                SlideShape::Picture(image) => {
                    if let Some(info) = pipeline.sink.accept(image, GeometryCheck::Skip) {
                        lines.push(image_markdown("Image", &info.url));
                    }
                }
                SlideShape::BrokenPicture(reason) => {
                    log::warn!("Slide {}: unreadable picture: {}", number, reason);
                }
            }
        }

        if lines.is_empty() {
            pipeline.out.push_line(NO_TEXT);
        } else {
            pipeline.out.extend(lines);
        }
        pipeline.out.push_blank();
    }

    pipeline.info("slides", slide_count);
    Ok(())
}
