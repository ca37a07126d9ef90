//! Paged layout (PDF) pipeline.

use super::Pipeline;
use crate::error::Result;
use crate::layout::{ContentOrderer, PageInput, TableDetector};
use crate::model::{PageLayout, Table};
use crate::render::TableRenderer;
use crate::source::PagedSource;
use crate::storage::GeometryCheck;

pub(crate) fn run(source: &mut dyn PagedSource, pipeline: &mut Pipeline<'_>) -> Result<()> {
    let detector = TableDetector::with_config(pipeline.options.detector.clone());
    let orderer = ContentOrderer::new();
    let renderer = TableRenderer::new();

    let page_count = source.page_count();
    log::info!("Processing {} pages", page_count);

    for index in 0..page_count {
        let number = index + 1;
        match source.load_page(index) {
            Ok(page) => emit_page(&page, number, &detector, &orderer, &renderer, pipeline),
            Err(e) if e.is_recoverable() => {
                log::warn!("Page {} parsing failed: {}", number, e);
                pipeline
                    .out
                    .push_paragraph(format!("*[Page {} parsing failed]*", number));
            }
            Err(e) => return Err(e),
        }
    }

    pipeline.info("pages", page_count);
    Ok(())
}

fn emit_page(
    page: &PageLayout,
    number: usize,
    detector: &TableDetector,
    orderer: &ContentOrderer,
    renderer: &TableRenderer,
    pipeline: &mut Pipeline<'_>,
) {
    let images = page
        .images
        .iter()
        .map(|image| pipeline.sink.accept(image, GeometryCheck::Enforce))
        .collect();

    // Tables with no visible cell would swallow the text under them
    let native_tables: Vec<Table> = page
        .tables
        .iter()
        .map(|t| Table::native(t.bbox, t.cells.clone()))
        .filter(|t| !t.is_blank())
        .enumerate()
        .map(|(k, t)| t.with_caption(table_caption(k + 1, number)))
        .collect();
    if native_tables.len() < page.tables.len() {
        log::debug!(
            "Page {}: skipped {} blank native tables",
            number,
            page.tables.len() - native_tables.len()
        );
    }

    let detected = if native_tables.is_empty() {
        detector
            .detect(&page.spans())
            .map(|t| t.with_caption(table_caption(1, number)))
    } else {
        None
    };

    let blocks = orderer.order(PageInput {
        blocks: &page.blocks,
        native_tables,
        detected,
        images,
    });
    log::debug!("Page {}: {} content blocks", number, blocks.len());

    for block in &blocks {
        pipeline.out.push_block(block, renderer);
    }
}

fn table_caption(ordinal: usize, page: usize) -> String {
    format!("**Table {}** (page {}):", ordinal, page)
}
