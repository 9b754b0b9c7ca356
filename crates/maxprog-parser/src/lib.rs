//! # maxprog-parser
//!
//! Loads progress spreadsheets into `Table`s.
//!
//! This crate provides:
//! - Workbook reading via `calamine` (`.xlsx`, `.xlsm`, `.xls`, `.ods`)
//! - Role-specific loaders that apply the header row of a layout and clean
//!   activity IDs
//! - Prior-day header checks against the shift calendar
//!
//! ## Example
//!
//! ```rust,ignore
//! use maxprog_core::WorkbookLayout;
//! use maxprog_parser::{load_discipline, load_master};
//!
//! let layout = WorkbookLayout::default();
//! let master = load_master("master.xlsx".as_ref(), &layout.master)?;
//! let civil = load_discipline("civil.xlsx".as_ref(), &layout.discipline)?;
//! ```

pub mod prior_day;
pub mod sheet;

pub use prior_day::scan_prior_day_headers;
pub use sheet::{load_table, table_from_grid};

use std::path::{Path, PathBuf};

use maxprog_core::{clean_ids, DisciplineLayout, MasterLayout, PriorDayLayout, Table};
use thiserror::Error;

/// Loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: unsupported file type (expected .xlsx, .xlsm, .xls or .ods)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{}: {message}", .path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("{}: workbook has no worksheets", .0.display())]
    NoWorksheet(PathBuf),

    #[error("{sheet}: header row {row} is beyond the last row of the sheet ({rows} rows)")]
    HeaderOutOfRange {
        sheet: String,
        row: usize,
        rows: usize,
    },
}

/// Spreadsheet formats readable by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Office Open XML (.xlsx, .xlsm)
    Xlsx,
    /// Legacy Excel (.xls)
    Xls,
    /// OpenDocument (.ods)
    Ods,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> Option<FileFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" => Some(FileFormat::Xlsx),
        "xls" => Some(FileFormat::Xls),
        "ods" => Some(FileFormat::Ods),
        _ => None,
    }
}

/// Load the master progress sheet and clean its ID column
pub fn load_master(path: &Path, layout: &MasterLayout) -> Result<Table, LoadError> {
    let table = load_table(path, layout.header_row)?;
    Ok(clean_ids(table, layout.id))
}

/// Load a discipline progress sheet and clean its ID column
pub fn load_discipline(path: &Path, layout: &DisciplineLayout) -> Result<Table, LoadError> {
    let table = load_table(path, layout.header_row)?;
    Ok(clean_ids(table, layout.id))
}

/// Load the prior day's output.
///
/// IDs are cleaned when the ID header is present; a missing header is left
/// for layout resolution to report.
pub fn load_prior_day(path: &Path, layout: &PriorDayLayout) -> Result<Table, LoadError> {
    let table = load_table(path, layout.header_row)?;
    match table.column_by_header(&layout.id_header) {
        Some(column) => Ok(clean_ids(table, column)),
        None => Ok(table),
    }
}
