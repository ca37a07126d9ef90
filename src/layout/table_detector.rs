//! Table inference from span geometry.
//!
//! Spans are clustered into rows by vertical position; if most rows share
//! the same number of spans, those rows are taken as a table. Only used on
//! pages where the reader exposed no native table.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Span, Table};

/// Vertical distance under which two spans belong to the same row.
pub const DEFAULT_Y_BAND: f32 = 5.0;
/// Minimum number of spans on a page before detection is attempted.
pub const DEFAULT_MIN_LINES: usize = 3;
/// Minimum number of rows a table must have.
pub const DEFAULT_MIN_ROWS: usize = 2;
/// Fraction of rows that must share the modal column count.
pub const DEFAULT_MODE_COVERAGE: f32 = 0.6;

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Row clustering band, in layout units
    pub y_band: f32,
    /// Minimum number of spans
    pub min_lines: usize,
    /// Minimum number of rows
    pub min_rows: usize,
    /// Required share of rows matching the modal column count (0.0-1.0)
    pub mode_coverage: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            y_band: DEFAULT_Y_BAND,
            min_lines: DEFAULT_MIN_LINES,
            min_rows: DEFAULT_MIN_ROWS,
            mode_coverage: DEFAULT_MODE_COVERAGE,
        }
    }
}

/// A row of spans sharing a vertical band, sorted left to right.
#[derive(Debug, Clone)]
pub struct Row {
    /// Spans in this row, sorted by x0
    pub spans: Vec<Span>,
}

impl Row {
    /// Number of cells in the row.
    pub fn width(&self) -> usize {
        self.spans.len()
    }
}

/// Infers at most one table per page from spans.
///
/// The detector is stateless: the consumed structural indices travel with
/// the returned [`Table`].
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &TableDetectorConfig {
        &self.config
    }

    /// Detect a table among the given spans.
    ///
    /// Rows whose width differs from the modal width are left out of the
    /// table and are not returned as text either.
    pub fn detect(&self, spans: &[Span]) -> Option<Table> {
        log::debug!("TableDetector: starting with {} spans", spans.len());

        if spans.len() < self.config.min_lines {
            log::debug!(
                "TableDetector: not enough spans ({} < {})",
                spans.len(),
                self.config.min_lines
            );
            return None;
        }

        let rows = self.group_into_rows(spans);
        log::debug!("TableDetector: grouped into {} rows", rows.len());

        if rows.len() < self.config.min_rows {
            log::debug!(
                "TableDetector: not enough rows ({} < {})",
                rows.len(),
                self.config.min_rows
            );
            return None;
        }

        let (mode, count) = modal_width(&rows)?;
        let required = rows.len() as f32 * self.config.mode_coverage;
        if mode <= 1 || (count as f32) < required {
            log::debug!(
                "TableDetector: rejected (mode {} covers {}/{} rows)",
                mode,
                count,
                rows.len()
            );
            return None;
        }

        let mut cells = Vec::with_capacity(count);
        let mut consumed = BTreeSet::new();
        for row in rows.iter().filter(|r| r.width() == mode) {
            cells.push(row.spans.iter().map(|s| s.text.clone()).collect::<Vec<_>>());
            consumed.extend(row.spans.iter().map(|s| s.structural_index));
        }

        log::debug!(
            "TableDetector: detected table {} rows x {} columns, {} blocks consumed",
            cells.len(),
            mode,
            consumed.len()
        );

        Some(Table::detected(cells, consumed))
    }

    /// Group spans into rows by y0.
    ///
    /// A span joins the current row while its y0 is within the band of the
    /// previous span's y0, so rows can drift downward gradually.
    pub fn group_into_rows(&self, spans: &[Span]) -> Vec<Row> {
        let mut sorted: Vec<&Span> = spans.iter().collect();
        sorted.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

        let mut rows: Vec<Row> = Vec::new();
        let mut current: Vec<Span> = Vec::new();
        let mut last_y: Option<f32> = None;

        for span in sorted {
            match last_y {
                Some(y) if (span.bbox.y0 - y).abs() >= self.config.y_band => {
                    rows.push(close_row(std::mem::take(&mut current)));
                }
                _ => {}
            }
            last_y = Some(span.bbox.y0);
            current.push(span.clone());
        }

        if !current.is_empty() {
            rows.push(close_row(current));
        }

        rows
    }
}

fn close_row(mut spans: Vec<Span>) -> Row {
    spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    Row { spans }
}

/// Most frequent row width and its count; ties go to the narrower width.
fn modal_width(rows: &[Row]) -> Option<(usize, usize)> {
    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for row in rows {
        *histogram.entry(row.width()).or_insert(0) += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    for (width, count) in histogram {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((width, count)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn make_span(text: &str, x: f32, y: f32, index: usize) -> Span {
        Span::new(text, BBox::new(x, y, x + 40.0, y + 8.0), index)
    }

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("B", 50.0, 0.0, 1),
            make_span("A", 0.0, 2.0, 0),
            make_span("C", 0.0, 10.0, 2),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spans[0].text, "A");
        assert_eq!(rows[0].spans[1].text, "B");
        assert_eq!(rows[1].spans[0].text, "C");
    }

    #[test]
    fn test_rows_chain_on_last_member() {
        let detector = TableDetector::new();
        // Each step is under the band, the total drift is not.
        let spans = vec![
            make_span("a", 0.0, 0.0, 0),
            make_span("b", 10.0, 4.0, 1),
            make_span("c", 20.0, 8.0, 2),
        ];
        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].width(), 3);
    }

    #[test]
    fn test_band_is_exclusive() {
        let detector = TableDetector::new();
        let spans = vec![make_span("a", 0.0, 0.0, 0), make_span("b", 0.0, 5.0, 1)];
        assert_eq!(detector.group_into_rows(&spans).len(), 2);
    }

    #[test]
    fn test_detect_drops_off_mode_rows() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("A", 0.0, 0.0, 0),
            make_span("B", 50.0, 0.0, 1),
            make_span("C", 0.0, 10.0, 2),
            make_span("D", 50.0, 10.0, 3),
            make_span("E", 0.0, 20.0, 4),
        ];

        let table = detector.detect(&spans).expect("table");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cells()[0], vec!["A".to_string(), "B".to_string()]);
        assert_eq!(table.cells()[1], vec!["C".to_string(), "D".to_string()]);

        let consumed: Vec<usize> = table.consumed_indices().unwrap().iter().copied().collect();
        assert_eq!(consumed, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_too_few_lines() {
        let detector = TableDetector::new();
        let spans = vec![make_span("A", 0.0, 0.0, 0), make_span("B", 50.0, 0.0, 1)];
        assert!(detector.detect(&spans).is_none());
    }

    #[test]
    fn test_single_row_rejected() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("A", 0.0, 0.0, 0),
            make_span("B", 50.0, 0.0, 1),
            make_span("C", 100.0, 1.0, 2),
        ];
        assert!(detector.detect(&spans).is_none());
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = TableDetector::new();
        let spans: Vec<Span> = (0..5)
            .map(|i| make_span(&format!("Line {}", i), 0.0, i as f32 * 20.0, i))
            .collect();
        assert!(detector.detect(&spans).is_none());
    }

    #[test]
    fn test_coverage_below_threshold() {
        let detector = TableDetector::new();
        // widths 2, 2, 1, 1, 3: the 1/2 tie resolves to 1, which is not a table
        let spans = vec![
            make_span("a", 0.0, 0.0, 0),
            make_span("b", 50.0, 0.0, 0),
            make_span("c", 0.0, 10.0, 1),
            make_span("d", 50.0, 10.0, 1),
            make_span("e", 0.0, 20.0, 2),
            make_span("f", 0.0, 30.0, 3),
            make_span("g", 0.0, 40.0, 4),
            make_span("h", 50.0, 40.0, 4),
            make_span("i", 100.0, 40.0, 4),
        ];
        assert!(detector.detect(&spans).is_none());
    }

    #[test]
    fn test_modal_width_tie_prefers_narrower() {
        let rows = vec![
            Row { spans: vec![make_span("a", 0.0, 0.0, 0); 3] },
            Row { spans: vec![make_span("a", 0.0, 0.0, 0); 2] },
        ];
        assert_eq!(modal_width(&rows), Some((2, 1)));
        assert_eq!(modal_width(&[]), None);
    }

    #[test]
    fn test_custom_config() {
        let detector = TableDetector::with_config(TableDetectorConfig {
            mode_coverage: 1.0,
            ..Default::default()
        });
        let spans = vec![
            make_span("A", 0.0, 0.0, 0),
            make_span("B", 50.0, 0.0, 1),
            make_span("C", 0.0, 10.0, 2),
            make_span("D", 50.0, 10.0, 3),
            make_span("E", 0.0, 20.0, 4),
        ];
        assert!(detector.detect(&spans).is_none());
        assert_eq!(detector.config().y_band, DEFAULT_Y_BAND);
    }
}
