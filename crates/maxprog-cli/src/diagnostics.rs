//! Diagnostic output for `run` and `check`
//!
//! Diagnostics go to stderr as text (`TerminalEmitter`) or into the JSON
//! document on stdout (`JsonEmitter`). `--strict` raises every warning to an
//! error and every hint to a warning; `--quiet` hides everything that is not
//! an error afterwards. Hidden diagnostics still count, so `--quiet` never
//! changes the exit code.

use std::io::Write;
use std::process;

use maxprog_core::{Diagnostic, DiagnosticEmitter, Severity};
use serde::Serialize;

/// Process exit status: 0 without errors, 1 otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
}

impl ExitCode {
    /// `count` is the number of errors after `--strict` escalation
    pub fn from_error_count(count: usize) -> Self {
        match count {
            0 => ExitCode::Success,
            _ => ExitCode::Failure,
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

/// `--strict` and `--quiet`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticConfig {
    pub strict: bool,
    pub quiet: bool,
}

impl DiagnosticConfig {
    pub fn new(strict: bool, quiet: bool) -> Self {
        Self { strict, quiet }
    }

    pub fn effective_severity(&self, severity: Severity) -> Severity {
        match (self.strict, severity) {
            (true, Severity::Warning) => Severity::Error,
            (true, Severity::Hint) => Severity::Warning,
            (_, severity) => severity,
        }
    }

    pub fn should_show(&self, severity: Severity) -> bool {
        !self.quiet || self.effective_severity(severity) == Severity::Error
    }

    /// Number of `diagnostics` that are errors under this policy
    pub fn error_count<'a>(
        &self,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    ) -> usize {
        diagnostics
            .into_iter()
            .filter(|d| self.effective_severity(d.severity) == Severity::Error)
            .count()
    }
}

/// Emitter behind `--format`, chosen at runtime
pub trait ReportingEmitter: DiagnosticEmitter {
    fn exit_code(&self) -> ExitCode;
}

/// Writes diagnostics in rustc style:
///
/// ```text
/// warning[W002]: progress value '10.5.2' is not a number, counted as 0
///   --> civil.xlsx, cell L12
///    |
///    = shift 28/11 (Day Shift)
///    = hint: enter progress as a fraction (0.45) or a percentage (45%)
/// ```
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    errors: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            errors: 0,
        }
    }

    fn write_diagnostic(
        &mut self,
        severity: Severity,
        diagnostic: &Diagnostic,
    ) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(
            w,
            "{}[{}]: {}",
            severity.as_str(),
            diagnostic.code.as_str(),
            diagnostic.message
        )?;

        match (&diagnostic.sheet, &diagnostic.cell) {
            (Some(sheet), Some(cell)) => writeln!(w, "  --> {sheet}, cell {cell}")?,
            (Some(sheet), None) => writeln!(w, "  --> {sheet}")?,
            (None, Some(cell)) => writeln!(w, "  --> cell {cell}")?,
            (None, None) => {}
        }

        if !diagnostic.notes.is_empty() {
            writeln!(w, "   |")?;
        }
        for note in &diagnostic.notes {
            writeln!(w, "   = {note}")?;
        }
        for hint in &diagnostic.hints {
            writeln!(w, "   = hint: {hint}")?;
        }
        writeln!(w)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let severity = self.config.effective_severity(diagnostic.severity);
        if severity == Severity::Error {
            self.errors += 1;
        }
        if self.config.should_show(diagnostic.severity) {
            // stderr may already be closed
            let _ = self.write_diagnostic(severity, &diagnostic);
        }
    }
}

impl<W: Write> ReportingEmitter for TerminalEmitter<W> {
    fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.errors)
    }
}

/// One entry of the `diagnostics` array in JSON output
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub code: String,
    pub severity: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// A1-style cell reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

/// Buffers diagnostics for the JSON document
pub struct JsonEmitter {
    config: DiagnosticConfig,
    entries: Vec<JsonDiagnostic>,
    errors: usize,
}

impl JsonEmitter {
    pub fn new(config: DiagnosticConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            errors: 0,
        }
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or(serde_json::Value::Null)
    }
}

impl DiagnosticEmitter for JsonEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let severity = self.config.effective_severity(diagnostic.severity);
        if severity == Severity::Error {
            self.errors += 1;
        }
        if !self.config.should_show(diagnostic.severity) {
            return;
        }

        self.entries.push(JsonDiagnostic {
            code: diagnostic.code.as_str().to_string(),
            severity: severity.as_str().to_string(),
            message: diagnostic.message,
            sheet: diagnostic.sheet,
            cell: diagnostic.cell.map(|c| c.to_string()),
            row: diagnostic.cell.map(|c| c.row),
            notes: diagnostic.notes,
            hints: diagnostic.hints,
        });
    }
}

impl ReportingEmitter for JsonEmitter {
    fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.errors)
    }
}
