//! Worksheet reading
//!
//! `calamine` hands back only the used range of a sheet, which may start
//! below row 1 or right of column A. The range is padded back to absolute
//! positions so that a layout's `header_row` and column indices address the
//! sheet exactly as the template describes it.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use maxprog_core::{CellValue, Row, Table};
use tracing::debug;

use crate::{detect_format, LoadError};

/// Read the first worksheet of `path` with the header at `header_row`
pub fn load_table(path: &Path, header_row: usize) -> Result<Table, LoadError> {
    if detect_format(path).is_none() {
        return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
    }

    let workbook_error = |e: calamine::Error| LoadError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet(path.to_path_buf()))?
        .map_err(workbook_error)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let table = table_from_grid(name, grid_from_range(&range), header_row)?;
    debug!(
        sheet = %table.name,
        rows = table.rows.len(),
        columns = table.width(),
        "loaded worksheet"
    );
    Ok(table)
}

/// Build a table from absolute rows: `header_row` is the header, every
/// following non-blank row is data.
pub fn table_from_grid(
    name: impl Into<String>,
    grid: Vec<Vec<CellValue>>,
    header_row: usize,
) -> Result<Table, LoadError> {
    let name = name.into();
    if header_row >= grid.len() {
        return Err(LoadError::HeaderOutOfRange {
            sheet: name,
            row: header_row,
            rows: grid.len(),
        });
    }

    let mut rows = grid.into_iter().enumerate().skip(header_row);
    let header = rows.next().map(|(_, cells)| cells).unwrap_or_default();

    let mut table = Table::new(name, header);
    table.rows = rows
        .map(|(index, cells)| Row::new(index + 1, cells))
        .filter(|row| !row.is_blank())
        .collect();
    Ok(table)
}

/// Pad the used range so row and column indices are absolute
fn grid_from_range(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let width = start_col + range.width();

    let mut grid = vec![vec![CellValue::Empty; width]; start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(cell_value));
        grid.push(cells);
    }
    grid
}

/// Map a calamine cell to a `CellValue`.
///
/// Error cells (`#N/A`, `#DIV/0!`) read as empty, the way a numeric export
/// turns them into missing values.
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
