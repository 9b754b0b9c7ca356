//! Diagnostics
//!
//! Non-fatal findings of a run: activities no discipline sheet reported,
//! progress cells that could not be read, duplicate IDs. They never change
//! the reconciled numbers; they tell the user which inputs to look at.
//!
//! Codes are stable and grouped by severity prefix:
//!
//! | Code | Severity | Meaning |
//! |------|----------|---------|
//! | E001 | error | input rejected (unreadable file, layout mismatch) |
//! | W001 | warning | activity not found in any discipline sheet |
//! | W002 | warning | progress cell is not a number, counted as zero |
//! | W003 | warning | activity ID repeated in the master sheet |
//! | W004 | warning | prior-day column outside the shift calendar |
//! | H001 | hint | master row without an activity ID, skipped |
//! | I001 | info | activity missing from one discipline sheet |
//! | I002 | info | run summary |

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Hint,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    E001InputRejected,
    W001ActivityNotReported,
    W002UnparseableProgress,
    W003DuplicateActivity,
    W004StalePriorDayColumn,
    H001BlankActivityId,
    I001MissingFromSheet,
    I002RunSummary,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::E001InputRejected => "E001",
            DiagnosticCode::W001ActivityNotReported => "W001",
            DiagnosticCode::W002UnparseableProgress => "W002",
            DiagnosticCode::W003DuplicateActivity => "W003",
            DiagnosticCode::W004StalePriorDayColumn => "W004",
            DiagnosticCode::H001BlankActivityId => "H001",
            DiagnosticCode::I001MissingFromSheet => "I001",
            DiagnosticCode::I002RunSummary => "I002",
        }
    }

    /// Default severity implied by the code prefix
    pub fn default_severity(&self) -> Severity {
        match self.as_str().as_bytes()[0] {
            b'E' => Severity::Error,
            b'W' => Severity::Warning,
            b'H' => Severity::Hint,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cell position: 1-based row, 0-based column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Spreadsheet column letters (0 → A, 25 → Z, 26 → AA)
    pub fn column_name(&self) -> String {
        let mut n = self.column + 1;
        let mut name = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            name.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        name.reverse();
        String::from_utf8_lossy(&name).into_owned()
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column_name(), self.row)
    }
}

/// A single diagnostic message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// Sheet (file) the finding refers to
    pub sheet: Option<String>,
    pub cell: Option<CellRef>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    /// New diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            sheet: None,
            cell: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// New diagnostic forced to error severity
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::new(code, message)
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_cell(mut self, cell: CellRef) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

/// Sink for diagnostics
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Emitter that keeps everything in memory, in emission order
#[derive(Debug, Default)]
pub struct CollectingEmitter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticEmitter for CollectingEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl Extend<Diagnostic> for CollectingEmitter {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.emit(diagnostic);
        }
    }
}
