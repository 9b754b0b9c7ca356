//! # maxprog-reconcile
//!
//! Maximum progress reconciliation.
//!
//! For every activity of the master sheet, progress per shift is the largest
//! figure reported anywhere: the prior day's output sets the floor, and each
//! discipline sheet can only raise it. Progress never goes backwards, and an
//! activity reported by several disciplines gets the highest report.
//!
//! # Algorithm
//!
//! 1. Validate layouts against every table (fail before any work)
//! 2. Collect unique master IDs in order of first appearance; a repeated ID
//!    takes the identifying fields of its last row
//! 3. Per activity: start from zeros, overwrite with the prior-day row,
//!    then raise each slot to the maximum of every discipline row
//! 4. Overall progress = sum of the slots
//!
//! ## Example
//!
//! ```rust
//! use maxprog_core::{CellValue, NoProgress, ReconcileInput, Reconciler, ShiftCalendar, Table};
//! use maxprog_reconcile::MaxProgressReconciler;
//!
//! let calendar = ShiftCalendar::from_dates(["28/11"]);
//! let reconciler = MaxProgressReconciler::new().with_calendar(calendar);
//!
//! let mut header = vec![CellValue::Empty; 13];
//! header[1] = CellValue::from("Activity ID");
//! let master = Table::new("master", header.clone())
//!     .with_row(vec![CellValue::Empty, CellValue::from("A1")]);
//!
//! let mut row = vec![CellValue::Empty; 13];
//! row[1] = CellValue::from("A1");
//! row[11] = CellValue::from("50%");
//! let civil = Table::new("civil", header).with_row(row);
//!
//! let input = ReconcileInput::new(master).discipline(civil);
//! let result = reconciler.reconcile(&input, &mut NoProgress).unwrap();
//! assert_eq!(result.report.activities[0].shifts, vec![0.5, 0.0]);
//! ```

pub mod index;
pub mod vector;

use std::collections::HashMap;

use maxprog_core::{
    activity_id, classify, ActivityId, CellRef, CellValue, Diagnostic, DiagnosticCode, Normalized,
    PriorDayColumns, ProgressObserver, ProgressReport, ReconcileError, ReconcileInput,
    ReconciledActivity, Reconciler, Reconciliation, Row, ShiftCalendar, Table, WorkbookLayout,
    NOT_AVAILABLE,
};
use tracing::{debug, info, trace};

use crate::index::SheetIndex;
use crate::vector::ProgressVector;

/// Reconciler taking the maximum reported progress per shift
#[derive(Clone, Debug, Default)]
pub struct MaxProgressReconciler {
    pub calendar: ShiftCalendar,
    pub layout: WorkbookLayout,
}

impl MaxProgressReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(mut self, calendar: ShiftCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_layout(mut self, layout: WorkbookLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Check every table against the layout without reconciling.
    ///
    /// Returns the resolved prior-day columns when a prior-day table is given.
    pub fn validate(
        &self,
        input: &ReconcileInput,
    ) -> Result<Option<PriorDayColumns>, ReconcileError> {
        if input.disciplines.is_empty() {
            return Err(ReconcileError::NoDisciplineSheets);
        }
        self.layout.validate(&self.calendar)?;
        self.layout.master.check(&input.master)?;
        for table in &input.disciplines {
            self.layout.discipline.check(table, &self.calendar)?;
        }
        let prior = input
            .prior_day
            .as_ref()
            .map(|table| self.layout.prior_day.resolve(table, &self.calendar))
            .transpose()?;
        Ok(prior)
    }

    /// Unique master rows in order of first appearance.
    ///
    /// A repeated ID keeps its position but takes the fields of its last row.
    fn master_activities<'a>(
        &self,
        master: &'a Table,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<(ActivityId, &'a Row)> {
        let id_column = self.layout.master.id;
        let mut seen: HashMap<ActivityId, usize> = HashMap::new();
        let mut activities: Vec<(ActivityId, &'a Row)> = Vec::new();

        for row in &master.rows {
            let id = activity_id(row.cell(id_column));
            if id.is_empty() {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::H001BlankActivityId,
                        format!("row {} has no activity ID and is skipped", row.line),
                    )
                    .with_sheet(master.name.clone())
                    .with_cell(CellRef::new(row.line, id_column)),
                );
                continue;
            }

            if let Some(&index) = seen.get(&id) {
                let previous = activities[index].1.line;
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::W003DuplicateActivity,
                        format!("activity '{id}' appears more than once in the master sheet"),
                    )
                    .with_sheet(master.name.clone())
                    .with_cell(CellRef::new(row.line, id_column))
                    .with_note(format!(
                        "identifying fields from row {previous} are replaced by row {}",
                        row.line
                    )),
                );
                activities[index].1 = row;
                continue;
            }

            seen.insert(id.clone(), activities.len());
            activities.push((id, row));
        }

        activities
    }

    /// Identifying fields copied from the master row
    fn master_fields(&self, row: &Row) -> [CellValue; 5] {
        self.layout.master.field_columns().map(|column| {
            row.get(column)
                .cloned()
                .unwrap_or_else(|| CellValue::from(NOT_AVAILABLE))
        })
    }

    /// Normalized values of `columns` in `row`, reporting unreadable cells
    fn read_slots(
        &self,
        table: &Table,
        row: &Row,
        columns: impl Iterator<Item = usize>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<f64> {
        columns
            .zip(self.calendar.slots())
            .map(|(column, slot)| {
                let outcome = classify(row.cell(column));
                if let Normalized::Unparseable(raw) = &outcome {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::W002UnparseableProgress,
                            format!("progress value '{raw}' is not a number, counted as 0"),
                        )
                        .with_sheet(table.name.clone())
                        .with_cell(CellRef::new(row.line, column))
                        .with_note(format!("shift {slot}"))
                        .with_hint("enter progress as a fraction (0.45) or a percentage (45%)"),
                    );
                }
                outcome.value()
            })
            .collect()
    }
}

impl Reconciler for MaxProgressReconciler {
    fn reconcile(
        &self,
        input: &ReconcileInput,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Reconciliation, ReconcileError> {
        let prior_columns = self.validate(input)?;

        let mut diagnostics = Vec::new();
        let activities = self.master_activities(&input.master, &mut diagnostics);

        let prior = input
            .prior_day
            .as_ref()
            .zip(prior_columns)
            .map(|(table, columns)| (SheetIndex::build(table, columns.id), columns));

        let disciplines: Vec<SheetIndex<'_>> = input
            .disciplines
            .iter()
            .map(|table| SheetIndex::build(table, self.layout.discipline.id))
            .collect();
        for sheet in &disciplines {
            debug!(sheet = sheet.name(), activities = sheet.len(), "indexed discipline sheet");
        }

        let slots = self.calendar.len();
        let total = input.master.rows.len() * disciplines.len();
        // Blank and repeated master rows count as already done
        let mut step = (input.master.rows.len() - activities.len()) * disciplines.len();
        let mut reconciled = Vec::with_capacity(activities.len());
        let mut not_reported = 0;

        for (id, master_row) in activities {
            let mut vector = ProgressVector::zeros(slots);

            if let Some((index, columns)) = &prior {
                if let Some(row) = index.get(&id) {
                    let floor = self.read_slots(
                        index.table,
                        row,
                        columns.slots.iter().copied(),
                        &mut diagnostics,
                    );
                    vector.overwrite(floor);
                }
            }

            let mut missing = Vec::new();
            for sheet in &disciplines {
                step += 1;
                match sheet.get(&id) {
                    Some(row) => {
                        let columns = (0..slots).map(|i| self.layout.discipline.slot_column(i));
                        let reported =
                            self.read_slots(sheet.table, row, columns, &mut diagnostics);
                        for (slot, value) in reported.into_iter().enumerate() {
                            vector.raise(slot, value);
                        }
                    }
                    None => missing.push(sheet.name()),
                }
                progress.on_progress(step, total);
            }

            if missing.len() == disciplines.len() {
                not_reported += 1;
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::W001ActivityNotReported,
                        format!("activity '{id}' not found in discipline sheets"),
                    )
                    .with_sheet(input.master.name.clone())
                    .with_cell(CellRef::new(master_row.line, self.layout.master.id))
                    .with_note(if prior.is_some() {
                        "progress kept at the prior-day figures"
                    } else {
                        "progress reported as zero"
                    }),
                );
            } else {
                for sheet in missing {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::I001MissingFromSheet,
                            format!("activity '{id}' not found in {sheet}"),
                        )
                        .with_sheet(sheet),
                    );
                }
            }

            trace!(activity = %id, overall = vector.total(), "reconciled activity");
            let activity = ReconciledActivity::new(id, vector.into_values())
                .fields(self.master_fields(master_row));
            reconciled.push(activity);
        }

        progress.on_progress(total, total);

        let report = ProgressReport::new(self.calendar.clone(), reconciled);
        info!(
            activities = report.len(),
            disciplines = disciplines.len(),
            not_reported,
            "reconciliation complete"
        );
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::I002RunSummary,
            format!(
                "reconciled {} activities from {} discipline sheet(s); {} not reported",
                report.len(),
                disciplines.len(),
                not_reported
            ),
        ));

        Ok(Reconciliation {
            report,
            diagnostics,
        })
    }
}
