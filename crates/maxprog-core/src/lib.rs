//! # maxprog-core
//!
//! Core domain model and traits for maxprog, the maximum progress
//! reconciler for shift-based turnaround progress sheets.
//!
//! This crate provides:
//! - Domain types: `ShiftCalendar`, `Table`, `ReconciledActivity`, `ProgressReport`
//! - Cell normalization: `normalize`, `classify`, `clean_ids`
//! - Column layouts of the input sheets: `WorkbookLayout`
//! - Core traits: `Reconciler`, `ProgressObserver`, `Renderer`
//! - Diagnostics and error types
//!
//! ## Example
//!
//! ```rust
//! use maxprog_core::{ProgressReport, ReconciledActivity, ShiftCalendar};
//!
//! let calendar = ShiftCalendar::default();
//! let mut shifts = vec![0.0; calendar.len()];
//! shifts[0] = 0.5;
//! let activity = ReconciledActivity::new("A1", shifts);
//! assert_eq!(activity.overall_progress, 0.5);
//!
//! let report = ProgressReport::new(calendar, vec![activity]);
//! assert_eq!(report.columns().len(), 7 + 24);
//! ```

pub mod calendar;
pub mod cell;
pub mod diagnostic;
pub mod layout;
pub mod table;

pub use calendar::{Shift, ShiftCalendar, ShiftSlot};
pub use cell::{activity_id, classify, clean_ids, normalize, CellValue, Normalized};
pub use diagnostic::{
    CellRef, CollectingEmitter, Diagnostic, DiagnosticCode, DiagnosticEmitter, Severity,
};
pub use layout::{DisciplineLayout, MasterLayout, PriorDayColumns, PriorDayLayout, WorkbookLayout};
pub use table::{Row, Table};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Placeholder for identifying fields the master row is too short to hold
pub const NOT_AVAILABLE: &str = "N/A";

/// Default name of the generated report
pub const OUTPUT_FILE_NAME: &str = "max_progress_3ajna_output.xlsx";

/// Content type offered with the generated report
pub const OUTPUT_MIME: &str = "application/vnd.ms-excel";

/// Report columns preceding the per-shift columns
pub const FIXED_COLUMNS: [&str; 7] = [
    "Activity ID",
    "Activity Description",
    "Location",
    "WP Owner",
    "Lead craft",
    "Eq Tag",
    "Overall Progress",
];

/// Unique identifier of an activity (whitespace already stripped)
pub type ActivityId = String;

// ============================================================================
// Report
// ============================================================================

/// Consolidated progress of one activity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciledActivity {
    pub id: ActivityId,
    pub description: CellValue,
    pub location: CellValue,
    pub wp_owner: CellValue,
    pub lead_craft: CellValue,
    pub eq_tag: CellValue,
    /// Sum of `shifts`
    pub overall_progress: f64,
    /// Resolved progress per calendar slot
    pub shifts: Vec<f64>,
}

impl ReconciledActivity {
    /// Activity with all identifying fields set to `N/A`
    pub fn new(id: impl Into<ActivityId>, shifts: Vec<f64>) -> Self {
        let na = || CellValue::Text(NOT_AVAILABLE.to_string());
        Self {
            id: id.into(),
            description: na(),
            location: na(),
            wp_owner: na(),
            lead_craft: na(),
            eq_tag: na(),
            overall_progress: shifts.iter().sum(),
            shifts,
        }
    }

    /// Set identifying fields in report order:
    /// description, location, WP owner, lead craft, equipment tag
    pub fn fields(mut self, fields: [CellValue; 5]) -> Self {
        let [description, location, wp_owner, lead_craft, eq_tag] = fields;
        self.description = description;
        self.location = location;
        self.wp_owner = wp_owner;
        self.lead_craft = lead_craft;
        self.eq_tag = eq_tag;
        self
    }

    /// Report row values after the ID, before the overall progress
    pub fn field_values(&self) -> [&CellValue; 5] {
        [
            &self.description,
            &self.location,
            &self.wp_owner,
            &self.lead_craft,
            &self.eq_tag,
        ]
    }

    /// Number of slots with any progress
    pub fn active_slots(&self) -> usize {
        self.shifts.iter().filter(|v| **v != 0.0).count()
    }
}

/// The consolidated report handed to renderers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub calendar: ShiftCalendar,
    pub activities: Vec<ReconciledActivity>,
}

impl ProgressReport {
    pub fn new(calendar: ShiftCalendar, activities: Vec<ReconciledActivity>) -> Self {
        Self {
            calendar,
            activities,
        }
    }

    /// Column headers: fixed columns then one per shift slot
    pub fn columns(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| (*c).to_string())
            .chain(self.calendar.labels())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&ReconciledActivity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Sum of overall progress across activities
    pub fn total_progress(&self) -> f64 {
        self.activities.iter().map(|a| a.overall_progress).sum()
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Cleaned input tables of one run
#[derive(Clone, Debug)]
pub struct ReconcileInput {
    pub master: Table,
    pub prior_day: Option<Table>,
    pub disciplines: Vec<Table>,
}

impl ReconcileInput {
    pub fn new(master: Table) -> Self {
        Self {
            master,
            prior_day: None,
            disciplines: Vec::new(),
        }
    }

    pub fn prior_day(mut self, table: Table) -> Self {
        self.prior_day = Some(table);
        self
    }

    pub fn discipline(mut self, table: Table) -> Self {
        self.disciplines.push(table);
        self
    }
}

/// Output of a reconciliation run
#[derive(Clone, Debug)]
pub struct Reconciliation {
    pub report: ProgressReport,
    pub diagnostics: Vec<Diagnostic>,
}

impl Reconciliation {
    /// Diagnostics with the given code
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}

/// Receives progress of a long-running operation
pub trait ProgressObserver {
    fn on_progress(&mut self, completed: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressObserver for F {
    fn on_progress(&mut self, completed: usize, total: usize) {
        self(completed, total);
    }
}

/// Observer that ignores all updates
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

/// Completed fraction in `[0, 1]`; an empty run counts as done
pub fn progress_fraction(completed: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        (completed as f64 / total as f64).min(1.0)
    }
}

/// Core reconciliation abstraction
pub trait Reconciler {
    /// Fold master, prior-day and discipline tables into one report
    fn reconcile(
        &self,
        input: &ReconcileInput,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Reconciliation, ReconcileError>;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a report to the output format
    fn render(&self, report: &ProgressReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// A sheet or layout does not match the template
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{sheet}: expected at least {needed} columns, found {found}")]
    TooFewColumns {
        sheet: String,
        needed: usize,
        found: usize,
    },

    #[error("{sheet}: missing column '{header}'")]
    MissingHeader { sheet: String, header: String },

    #[error("Invalid layout: {0}")]
    Invalid(String),
}

/// Reconciliation error
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Please provide at least one discipline progress sheet")]
    NoDisciplineSheets,

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
