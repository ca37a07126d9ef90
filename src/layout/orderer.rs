//! Merges text, tables and images of one page into reading order.

use crate::model::{ContentBlock, ContentKind, ImageInfo, LayoutBlock, SortKey, Table};

/// Overhang allowed when testing whether a block sits inside a native table.
pub const DEFAULT_TABLE_SLACK: f32 = 5.0;

/// Everything the orderer needs for one page.
#[derive(Debug, Default)]
pub struct PageInput<'a> {
    /// Blocks in structural order
    pub blocks: &'a [LayoutBlock],
    /// Tables exposed by the reader, with bounds
    pub native_tables: Vec<Table>,
    /// Table inferred by the detector, if any
    pub detected: Option<Table>,
    /// Stored images in discovery order; `None` marks a rejected image
    pub images: Vec<Option<ImageInfo>>,
}

/// Produces one position-ordered block sequence per page.
///
/// Every structural index ends up in at most one emitted block: blocks
/// inside a native table are represented by the table, blocks consumed by a
/// detected table collapse into the table at the first consumed position.
#[derive(Debug, Clone)]
pub struct ContentOrderer {
    slack: f32,
}

impl Default for ContentOrderer {
    fn default() -> Self {
        Self {
            slack: DEFAULT_TABLE_SLACK,
        }
    }
}

impl ContentOrderer {
    /// Create an orderer with the default containment slack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Order the page content.
    pub fn order(&self, input: PageInput<'_>) -> Vec<ContentBlock> {
        let PageInput {
            blocks,
            native_tables,
            detected,
            images,
        } = input;

        let native_bounds: Vec<_> = native_tables
            .iter()
            .map(|t| t.bbox().unwrap_or_default())
            .collect();
        let mut absorbed: Vec<Vec<usize>> = vec![Vec::new(); native_tables.len()];

        let consumed = detected
            .as_ref()
            .and_then(|t| t.consumed_indices())
            .cloned()
            .unwrap_or_default();
        let anchor = consumed.first().copied();
        let mut detected = detected;

        let mut images = images.into_iter();
        let mut out: Vec<ContentBlock> = Vec::with_capacity(blocks.len() + native_tables.len());

        for (idx, block) in blocks.iter().enumerate() {
            let bbox = block.bbox();

            // Pictures take the next image slot even when the image is
            // dropped, so later pictures stay aligned.
            let slot = if block.is_picture() {
                images.next()
            } else {
                None
            };

            if let Some(table_idx) = native_bounds
                .iter()
                .position(|b| b.contains(&bbox, self.slack))
            {
                log::debug!(
                    "ContentOrderer: block {} inside native table {}",
                    idx,
                    table_idx
                );
                absorbed[table_idx].push(idx);
                continue;
            }

            match block {
                LayoutBlock::Text { .. } if consumed.contains(&idx) => {
                    if Some(idx) == anchor {
                        if let Some(table) = detected.take() {
                            out.push(ContentBlock::new(
                                ContentKind::Table(table),
                                SortKey::at(bbox.y0, idx),
                                consumed.iter().copied().collect(),
                            ));
                        }
                    }
                }
                LayoutBlock::Text { .. } => {
                    if let Some(text) = block.text_content() {
                        out.push(ContentBlock::new(
                            ContentKind::Text(text),
                            SortKey::at(bbox.y0, idx),
                            vec![idx],
                        ));
                    }
                }
                LayoutBlock::Picture { .. } => {
                    if let Some(Some(info)) = slot {
                        out.push(ContentBlock::new(
                            ContentKind::Image(info),
                            SortKey::at(bbox.y0, idx),
                            vec![idx],
                        ));
                    }
                }
            }
        }

        for (ordinal, (table, indices)) in native_tables.into_iter().zip(absorbed).enumerate() {
            let y = native_bounds[ordinal].y0;
            out.push(ContentBlock::new(
                ContentKind::Table(table),
                SortKey::native_table(y, ordinal),
                indices,
            ));
        }

        out.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

        // Images without a picture block keep discovery order at the end.
        let tail_y = out.last().map(|b| b.y_position()).unwrap_or(0.0);
        for (n, info) in images.flatten().enumerate() {
            out.push(ContentBlock::new(
                ContentKind::Image(info),
                SortKey::at(tail_y, blocks.len() + n),
                Vec::new(),
            ));
        }

        out
    }
}
