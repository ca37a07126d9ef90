//! Flow layout (DOCX) pipeline.

use super::Pipeline;
use crate::error::Result;
use crate::layout::{HeaderFooterFilter, ParagraphClassifier};
use crate::model::{FlowElement, ImageInfo, Table};
use crate::render::TableRenderer;
use crate::source::FlowSource;
use crate::storage::GeometryCheck;
use std::collections::HashMap;

const EMPTY_TABLE: &str = "*[Empty table]*";

pub(crate) fn run(source: &mut dyn FlowSource, pipeline: &mut Pipeline<'_>) -> Result<()> {
    let images = store_images(source, pipeline);

    let body = source.body()?;
    let paragraph_count = body
        .iter()
        .filter(|e| matches!(e, FlowElement::Paragraph(_)))
        .count();
    let table_count = body.len() - paragraph_count;
    log::info!(
        "Document contains {} paragraphs and {} tables",
        paragraph_count,
        table_count
    );

    let filter = HeaderFooterFilter::new();
    let corpus = pipeline.options.filter_headers_footers.then(|| {
        filter.collect(body.iter().filter_map(|e| match e {
            FlowElement::Paragraph(p) => Some(p.text.as_str()),
            FlowElement::Table(_) => None,
        }))
    });

    let classifier = ParagraphClassifier::new();
    let renderer = TableRenderer::new();
    let mut table_number = 0;

    for element in &body {
        match element {
            FlowElement::Table(index) => {
                table_number += 1;
                emit_table(source, *index, table_number, &renderer, pipeline)?;
            }
            FlowElement::Paragraph(paragraph) => {
                if corpus.as_ref().is_some_and(|c| c.is_noise(&paragraph.text)) {
                    log::debug!("Filtering header/footer: {:.50}", paragraph.trimmed());
                    continue;
                }

                match classifier.classify(paragraph) {
                    Some(classified) => pipeline.out.push_paragraph(classified.to_markdown()),
                    None => pipeline.out.push_blank(),
                }

                for rel_id in &paragraph.image_refs {
                    if let Some(info) = images.get(rel_id) {
                        pipeline.out.push_image(info);
                    }
                }
            }
        }
    }

    pipeline.info("paragraphs", paragraph_count);
    pipeline.info("tables", table_count);
    Ok(())
}

fn store_images(source: &mut dyn FlowSource, pipeline: &mut Pipeline<'_>) -> HashMap<String, ImageInfo> {
    let raw = match source.images() {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Error extracting images: {}", e);
            return HashMap::new();
        }
    };

    let mut by_rel_id = HashMap::new();
    for image in &raw {
        if let Some(info) = pipeline.sink.accept(image, GeometryCheck::Skip) {
            if let Some(rel_id) = &image.rel_id {
                by_rel_id.insert(rel_id.clone(), info);
            }
        }
    }
    log::info!("Extracted {} images", pipeline.sink.images().len());
    by_rel_id
}

fn emit_table(
    source: &mut dyn FlowSource,
    index: usize,
    number: usize,
    renderer: &TableRenderer,
    pipeline: &mut Pipeline<'_>,
) -> Result<()> {
    let cells = match source.table(index) {
        Ok(cells) => cells,
        Err(e) if e.is_recoverable() => {
            log::warn!("Error processing table {}: {}", number, e);
            pipeline
                .out
                .push_paragraph(format!("*[Table {} parsing failed]*", number));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let title = format!("**Table {}:**", number);
    let table = Table::inline(cells).with_caption(title.as_str());
    match renderer.render(&table) {
        Some(lines) => pipeline.out.extend(lines),
        None => {
            pipeline.out.push_paragraph(title);
            pipeline.out.push_line(EMPTY_TABLE);
        }
    }
    pipeline.out.push_blank();
    Ok(())
}
