//! Column layouts of the input sheets
//!
//! The progress template is positional: the master sheet keeps its
//! identifying fields at fixed columns and discipline sheets keep the shift
//! columns in one contiguous block. These structures name those positions so
//! they can be configured and checked against each loaded table before any
//! reconciliation starts. A sheet that drifted from the template fails with a
//! `LayoutError` instead of silently reading the wrong column.
//!
//! All rows and columns are 0-based (`header_row: 8` is spreadsheet row 9,
//! column 1 is column B).

use serde::{Deserialize, Serialize};

use crate::calendar::ShiftCalendar;
use crate::table::Table;
use crate::LayoutError;

/// Header name of the ID column in prior-day output
pub const ACTIVITY_ID_HEADER: &str = "Activity ID";

/// Column positions in the master progress sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterLayout {
    pub header_row: usize,
    pub id: usize,
    pub description: usize,
    pub location: usize,
    pub wp_owner: usize,
    pub lead_craft: usize,
    pub eq_tag: usize,
}

impl Default for MasterLayout {
    fn default() -> Self {
        Self {
            header_row: 8,
            id: 1,
            description: 2,
            location: 6,
            wp_owner: 7,
            lead_craft: 8,
            eq_tag: 46,
        }
    }
}

impl MasterLayout {
    /// Identifying field columns in output order
    pub fn field_columns(&self) -> [usize; 5] {
        [
            self.description,
            self.location,
            self.wp_owner,
            self.lead_craft,
            self.eq_tag,
        ]
    }

    /// The ID column must exist; identifying fields may be missing
    pub fn check(&self, table: &Table) -> Result<(), LayoutError> {
        if table.width() <= self.id {
            return Err(LayoutError::TooFewColumns {
                sheet: table.name.clone(),
                needed: self.id + 1,
                found: table.width(),
            });
        }
        Ok(())
    }
}

/// Column positions in a discipline progress sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisciplineLayout {
    pub header_row: usize,
    pub id: usize,
    /// First of the contiguous shift progress columns
    pub progress_start: usize,
}

impl Default for DisciplineLayout {
    fn default() -> Self {
        Self {
            header_row: 8,
            id: 1,
            progress_start: 11,
        }
    }
}

impl DisciplineLayout {
    /// Column holding progress for slot `index`
    pub fn slot_column(&self, index: usize) -> usize {
        self.progress_start + index
    }

    /// The header must reach the last shift column
    pub fn check(&self, table: &Table, calendar: &ShiftCalendar) -> Result<(), LayoutError> {
        let needed = (self.progress_start + calendar.len()).max(self.id + 1);
        if table.width() < needed {
            return Err(LayoutError::TooFewColumns {
                sheet: table.name.clone(),
                needed,
                found: table.width(),
            });
        }
        Ok(())
    }
}

/// Prior-day output is located by header names, not positions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorDayLayout {
    pub header_row: usize,
    pub id_header: String,
}

impl Default for PriorDayLayout {
    fn default() -> Self {
        Self {
            header_row: 0,
            id_header: ACTIVITY_ID_HEADER.to_string(),
        }
    }
}

/// Prior-day columns resolved against a loaded table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorDayColumns {
    pub id: usize,
    /// One column per calendar slot, in calendar order
    pub slots: Vec<usize>,
}

impl PriorDayLayout {
    pub fn resolve(
        &self,
        table: &Table,
        calendar: &ShiftCalendar,
    ) -> Result<PriorDayColumns, LayoutError> {
        let id = table
            .column_by_header(&self.id_header)
            .ok_or_else(|| LayoutError::MissingHeader {
                sheet: table.name.clone(),
                header: self.id_header.clone(),
            })?;

        let slots = calendar
            .slots()
            .iter()
            .map(|slot| {
                let label = slot.label();
                table
                    .column_by_header(&label)
                    .ok_or_else(|| LayoutError::MissingHeader {
                        sheet: table.name.clone(),
                        header: label,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PriorDayColumns { id, slots })
    }
}

/// Layouts for all three input roles
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookLayout {
    pub master: MasterLayout,
    pub discipline: DisciplineLayout,
    pub prior_day: PriorDayLayout,
}

impl WorkbookLayout {
    /// Reject layouts that contradict themselves, independent of any table
    pub fn validate(&self, calendar: &ShiftCalendar) -> Result<(), LayoutError> {
        if calendar.is_empty() {
            return Err(LayoutError::Invalid("shift calendar has no slots".into()));
        }

        let d = &self.discipline;
        let progress = d.progress_start..d.progress_start + calendar.len();
        if progress.contains(&d.id) {
            return Err(LayoutError::Invalid(format!(
                "discipline ID column {} lies inside the progress columns {}..{}",
                d.id, progress.start, progress.end
            )));
        }

        let m = &self.master;
        if m.field_columns().contains(&m.id) {
            return Err(LayoutError::Invalid(format!(
                "master ID column {} is also used for an identifying field",
                m.id
            )));
        }

        if self.prior_day.id_header.trim().is_empty() {
            return Err(LayoutError::Invalid(
                "prior-day ID header must not be empty".into(),
            ));
        }

        Ok(())
    }
}
