//! In-memory sheet tables
//!
//! A `Table` is one worksheet after loading: a header row plus data rows.
//! Column indices are absolute sheet positions (column A = 0), so layouts
//! written against the spreadsheet template apply unchanged.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// One data row of a sheet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// 1-based row number in the source sheet
    pub line: usize,
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(line: usize, cells: Vec<CellValue>) -> Self {
        Self { line, cells }
    }

    /// Cell at `column`, `None` when the row is too short
    pub fn get(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Cell at `column`, treating a short row as empty
    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Empty)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if every cell is empty
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

/// A loaded worksheet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Display name (usually the file name)
    pub name: String,
    pub header: Vec<CellValue>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, header: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    /// Append a data row; its line number follows the previous row
    pub fn with_row(mut self, cells: Vec<CellValue>) -> Self {
        let line = self.rows.last().map_or(2, |r| r.line + 1);
        self.rows.push(Row::new(line, cells));
        self
    }

    /// Number of header columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Index of the first header cell whose trimmed text equals `name`
    pub fn column_by_header(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|cell| cell.to_text().trim() == name)
    }
}
