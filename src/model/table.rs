//! Table types.

use super::BBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a table came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum TableOrigin {
    /// Exposed by the source format, with known bounds
    Native {
        /// Table bounds
        bbox: BBox,
    },
    /// Inferred from span geometry
    Detected {
        /// Structural indices of the blocks the table absorbed
        consumed: BTreeSet<usize>,
    },
    /// A flow-layout or spreadsheet table placed by traversal order
    Inline,
}

/// A rectangular table of plain-text cells.
///
/// Every row has the same number of cells; constructors pad short rows
/// with empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Origin of the table
    pub origin: TableOrigin,

    cells: Vec<Vec<String>>,

    /// Table caption
    pub caption: Option<String>,
}

impl Table {
    /// Create a table of the given origin, padding rows to a uniform width.
    pub fn new(origin: TableOrigin, cells: Vec<Vec<String>>) -> Self {
        Self {
            origin,
            cells: pad_rows(cells),
            caption: None,
        }
    }

    /// Create a native table.
    pub fn native(bbox: BBox, cells: Vec<Vec<String>>) -> Self {
        Self::new(TableOrigin::Native { bbox }, cells)
    }

    /// Create a detected table.
    pub fn detected(cells: Vec<Vec<String>>, consumed: BTreeSet<usize>) -> Self {
        Self::new(TableOrigin::Detected { consumed }, cells)
    }

    /// Create a table placed by traversal order.
    pub fn inline(cells: Vec<Vec<String>>) -> Self {
        Self::new(TableOrigin::Inline, cells)
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Cell matrix.
    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(|c| c.trim().is_empty())
    }

    /// Bounds, for native tables.
    pub fn bbox(&self) -> Option<BBox> {
        match &self.origin {
            TableOrigin::Native { bbox } => Some(*bbox),
            _ => None,
        }
    }

    /// Consumed structural indices, for detected tables.
    pub fn consumed_indices(&self) -> Option<&BTreeSet<usize>> {
        match &self.origin {
            TableOrigin::Detected { consumed } => Some(consumed),
            _ => None,
        }
    }
}

fn pad_rows(mut cells: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let width = cells.iter().map(|r| r.len()).max().unwrap_or(0);
    for row in &mut cells {
        row.resize(width, String::new());
    }
    cells
}
