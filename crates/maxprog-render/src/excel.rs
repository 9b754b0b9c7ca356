//! Excel progress report renderer
//!
//! Writes the consolidated report as a single worksheet:
//!
//! ```text
//! | Activity ID | Activity Description | Location | WP Owner | Lead craft | Eq Tag | Overall Progress | 28/11 (Day Shift) | ...
//! |-------------|----------------------|----------|----------|------------|--------|------------------|-------------------| ...
//! | A1          | Pump alignment       | Unit 100 | MECH     | Fitter     | P-101A | 0.75             | 0.5               | ...
//! ```
//!
//! The header row has a navy fill with bold white text, and every used cell
//! has a dashed black border.

use std::collections::HashMap;
use std::path::Path;

use maxprog_core::{CellValue, ProgressReport, RenderError, Renderer};
use rust_xlsxwriter::{Format, FormatBorder, FormatPattern, Workbook, Worksheet};

use crate::report::{apply_borders, apply_header_style, BorderLine, CellStyle, ReportSheet};

/// Excel report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Worksheet name
    pub sheet_name: String,
    /// Width of the ID and description columns, in characters
    pub id_width: f64,
    pub description_width: f64,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".into(),
            id_width: 16.0,
            description_width: 40.0,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Lay out and style the report sheet
    pub fn sheet(&self, report: &ProgressReport) -> ReportSheet {
        let mut sheet = ReportSheet::from_report(report);
        sheet.name = self.sheet_name.clone();
        apply_header_style(&mut sheet);
        apply_borders(&mut sheet);
        sheet
    }

    /// Serialize an already styled sheet
    pub fn render_sheet(&self, sheet: &ReportSheet) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        write_cells(worksheet, sheet)?;

        worksheet.set_column_width(0, self.id_width).ok();
        worksheet.set_column_width(1, self.description_width).ok();

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Render the report and save it to `path`
    pub fn write_to(&self, report: &ProgressReport, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render(report)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &ProgressReport) -> Result<Vec<u8>, RenderError> {
        self.render_sheet(&self.sheet(report))
    }
}

fn write_cells(worksheet: &mut Worksheet, sheet: &ReportSheet) -> Result<(), RenderError> {
    let mut formats: HashMap<CellStyle, Format> = HashMap::new();

    for (r, cells) in sheet.rows().iter().enumerate() {
        let row = u32::try_from(r)
            .map_err(|_| RenderError::InvalidData(format!("row {r} is out of range")))?;
        for (c, cell) in cells.iter().enumerate() {
            let col = u16::try_from(c)
                .map_err(|_| RenderError::InvalidData(format!("column {c} is out of range")))?;

            if cell.style.is_plain() {
                write_value(worksheet, row, col, &cell.value)?;
                continue;
            }

            let format = formats
                .entry(cell.style)
                .or_insert_with(|| format_for(&cell.style));
            write_styled(worksheet, row, col, &cell.value, format)?;
        }
    }

    Ok(())
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> Result<(), RenderError> {
    let result = match value {
        CellValue::Empty => return Ok(()),
        CellValue::Number(n) | CellValue::DateTime(n) => worksheet.write(row, col, *n),
        CellValue::Text(s) => worksheet.write(row, col, s.as_str()),
        CellValue::Bool(b) => worksheet.write(row, col, *b),
    };
    result
        .map(|_| ())
        .map_err(|e| RenderError::Format(e.to_string()))
}

fn write_styled(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> Result<(), RenderError> {
    let result = match value {
        CellValue::Empty => worksheet.write_blank(row, col, format),
        CellValue::Number(n) | CellValue::DateTime(n) => {
            worksheet.write_with_format(row, col, *n, format)
        }
        CellValue::Text(s) => worksheet.write_with_format(row, col, s.as_str(), format),
        CellValue::Bool(b) => worksheet.write_with_format(row, col, *b, format),
    };
    result
        .map(|_| ())
        .map_err(|e| RenderError::Format(e.to_string()))
}

fn format_for(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if let Some(fill) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(fill);
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(color);
    }
    if style.bold {
        format = format.set_bold();
    }
    if let Some(border) = style.border {
        let line = match border.line {
            BorderLine::Thin => FormatBorder::Thin,
            BorderLine::Dashed => FormatBorder::Dashed,
        };
        format = format.set_border(line).set_border_color(border.color);
    }
    format
}
