//! Markdown grid rendering for cell matrices.

use crate::model::Table;

/// How the header row of a table is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Row 0 is the header unless it is blank or only short numbers
    #[default]
    Infer,
    /// Row 0 is the header whenever there is more than one row
    FirstRow,
}

/// Table rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRenderConfig {
    /// Header selection
    pub header_policy: HeaderPolicy,
    /// Text shown in empty data cells
    pub empty_cell: Option<String>,
}

impl Default for TableRenderConfig {
    fn default() -> Self {
        Self {
            header_policy: HeaderPolicy::Infer,
            empty_cell: Some("-".to_string()),
        }
    }
}

impl TableRenderConfig {
    /// Spreadsheet style: first row is the header, empty cells stay empty.
    pub fn spreadsheet() -> Self {
        Self {
            header_policy: HeaderPolicy::FirstRow,
            empty_cell: None,
        }
    }
}

/// Renders cell matrices as Markdown grids.
#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    config: TableRenderConfig,
}

impl TableRenderer {
    /// Create a renderer with header inference and `-` for empty cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom configuration.
    pub fn with_config(config: TableRenderConfig) -> Self {
        Self { config }
    }

    /// Render a table, using its caption as the title line.
    ///
    /// Returns `None` when no row has visible content.
    pub fn render(&self, table: &Table) -> Option<Vec<String>> {
        self.render_cells(table.cells(), table.caption.as_deref())
    }

    /// Render a possibly ragged cell matrix.
    pub fn render_cells(&self, cells: &[Vec<String>], title: Option<&str>) -> Option<Vec<String>> {
        let rows: Vec<Vec<String>> = cells
            .iter()
            .map(|row| row.iter().map(|c| clean_cell(c)).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .collect();

        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return None;
        }

        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();

        let (header, data) = self.split_header(&rows, width);

        let mut lines = Vec::with_capacity(data.len() + 4);
        if let Some(title) = title {
            lines.push(title.to_string());
            lines.push(String::new());
        }
        lines.push(grid_line(&header));
        lines.push(grid_line(&vec!["---".to_string(); width]));
        for row in data {
            let shown: Vec<String> = row
                .iter()
                .map(|c| match (&self.config.empty_cell, c.is_empty()) {
                    (Some(marker), true) => marker.clone(),
                    _ => c.clone(),
                })
                .collect();
            lines.push(grid_line(&shown));
        }

        Some(lines)
    }

    fn split_header<'r>(&self, rows: &'r [Vec<String>], width: usize) -> (Vec<String>, &'r [Vec<String>]) {
        let first_is_header = match self.config.header_policy {
            HeaderPolicy::Infer => !rows[0].iter().all(|h| h.is_empty() || is_short_number(h)),
            HeaderPolicy::FirstRow => rows.len() > 1,
        };

        if first_is_header {
            let header = rows[0]
                .iter()
                .enumerate()
                .map(|(i, h)| if h.is_empty() { column_label(i) } else { h.clone() })
                .collect();
            (header, &rows[1..])
        } else {
            ((0..width).map(column_label).collect(), rows)
        }
    }
}

/// Synthetic label for column `i` (0-indexed).
pub fn column_label(i: usize) -> String {
    format!("Column{}", i + 1)
}

/// Escape a cell so it cannot break the grid.
pub fn clean_cell(cell: &str) -> String {
    cell.trim()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

fn is_short_number(s: &str) -> bool {
    s.len() <= 3 && s.chars().all(|c| c.is_ascii_digit())
}

fn grid_line(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
