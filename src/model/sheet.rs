//! Spreadsheet cell model.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Workbook date system used to interpret serial dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSystem {
    /// 1900 system (Windows default, with the Lotus leap-year quirk)
    #[default]
    #[serde(rename = "1900")]
    V1900,
    /// 1904 system (classic Mac)
    #[serde(rename = "1904")]
    V1904,
}

/// A typed cell value as read from a workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No value
    #[default]
    Empty,
    /// String cell
    Text(String),
    /// Numeric cell with its number format code, if any
    Number {
        /// Numeric value
        value: f64,
        /// Number format code (e.g. "yyyy-mm-dd", "0.00")
        #[serde(default)]
        format: Option<String>,
    },
    /// Boolean cell
    Bool(bool),
    /// Cell typed as a date whose value is still a serial number
    DateSerial(f64),
    /// Date cell
    Date(NaiveDate),
    /// Date-time cell
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Numeric cell without a format.
    pub fn number(value: f64) -> Self {
        CellValue::Number {
            value,
            format: None,
        }
    }

    /// Numeric cell with a format code.
    pub fn formatted(value: f64, format: impl Into<String>) -> Self {
        CellValue::Number {
            value,
            format: Some(format.into()),
        }
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// One worksheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// Rows of cells over the used range
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Check if no cell holds a value.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(CellValue::is_empty)
    }
}
