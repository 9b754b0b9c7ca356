//! Report sheet model and formatting
//!
//! The output sheet is laid out in memory first, then styled, then handed to
//! a writer. Styling works on this model instead of a saved file, so the
//! writer only ever serializes a finished sheet.
//!
//! The two formatting operations touch disjoint style properties: the header
//! style sets fill, font colour and weight, the borders set the border. Both
//! are idempotent and can run in either order.
//!
//! ```rust
//! use maxprog_core::{ProgressReport, ReconciledActivity, ShiftCalendar};
//! use maxprog_render::report::{apply_borders, apply_header_style, ReportSheet, HEADER_FILL};
//!
//! let calendar = ShiftCalendar::from_dates(["28/11"]);
//! let report = ProgressReport::new(calendar, vec![ReconciledActivity::new("A1", vec![0.5, 0.0])]);
//!
//! let mut sheet = ReportSheet::from_report(&report);
//! apply_header_style(&mut sheet);
//! apply_borders(&mut sheet);
//!
//! assert_eq!(sheet.cell(0, 0).unwrap().style.fill, Some(HEADER_FILL));
//! assert_eq!(sheet.used_range(), Some((2, 9)));
//! ```

use maxprog_core::{CellValue, ProgressReport};

/// Header fill colour (dark navy)
pub const HEADER_FILL: u32 = 0x002060;

/// Header font colour
pub const HEADER_FONT: u32 = 0xFFFFFF;

/// Colour of cell borders
pub const BORDER_COLOR: u32 = 0x000000;

/// Line style of a cell border
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BorderLine {
    Thin,
    Dashed,
}

/// Border drawn on all four sides of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Border {
    pub line: BorderLine,
    pub color: u32,
}

/// Visual properties of one cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    /// Solid background fill
    pub fill: Option<u32>,
    pub font_color: Option<u32>,
    pub bold: bool,
    pub border: Option<Border>,
}

impl CellStyle {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A cell of the report sheet
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportCell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl ReportCell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            style: CellStyle::default(),
        }
    }
}

/// A worksheet in memory: rows of styled cells, row 0 is the header
#[derive(Clone, Debug, PartialEq)]
pub struct ReportSheet {
    pub name: String,
    rows: Vec<Vec<ReportCell>>,
}

impl ReportSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Lay out a report: header row, then one row per activity
    pub fn from_report(report: &ProgressReport) -> Self {
        let mut sheet = Self::new("Sheet1");
        sheet.push_row(report.columns().into_iter().map(ReportCell::new).collect());

        for activity in &report.activities {
            let mut row = Vec::with_capacity(7 + activity.shifts.len());
            row.push(ReportCell::new(activity.id.as_str()));
            row.extend(
                activity
                    .field_values()
                    .into_iter()
                    .map(|value| ReportCell::new(value.clone())),
            );
            row.push(ReportCell::new(activity.overall_progress));
            row.extend(activity.shifts.iter().map(|v| ReportCell::new(*v)));
            sheet.push_row(row);
        }

        sheet
    }

    pub fn push_row(&mut self, row: Vec<ReportCell>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<ReportCell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&ReportCell> {
        self.rows.get(row)?.get(column)
    }

    /// `(rows, columns)` covered by data, `None` for an empty sheet
    pub fn used_range(&self) -> Option<(usize, usize)> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if self.rows.is_empty() || columns == 0 {
            None
        } else {
            Some((self.rows.len(), columns))
        }
    }
}

/// Navy fill with bold white text on every header cell
pub fn apply_header_style(sheet: &mut ReportSheet) {
    if let Some(header) = sheet.rows.first_mut() {
        for cell in header {
            cell.style.fill = Some(HEADER_FILL);
            cell.style.font_color = Some(HEADER_FONT);
            cell.style.bold = true;
        }
    }
}

/// Dashed black border around every cell of the used range.
///
/// Short rows are padded with empty cells first so the bordered area is a
/// rectangle.
pub fn apply_borders(sheet: &mut ReportSheet) {
    let Some((_, columns)) = sheet.used_range() else {
        return;
    };
    let border = Border {
        line: BorderLine::Dashed,
        color: BORDER_COLOR,
    };
    for row in &mut sheet.rows {
        row.resize_with(columns, ReportCell::default);
        for cell in row {
            cell.style.border = Some(border);
        }
    }
}
