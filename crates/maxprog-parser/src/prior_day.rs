//! Prior-day header checks
//!
//! Yesterday's report may carry shift columns the current calendar no longer
//! tracks, or slot headers typed slightly differently. Those columns are
//! never read; this module names them so the user knows.

use std::sync::OnceLock;

use maxprog_core::{Diagnostic, DiagnosticCode, ShiftCalendar, ShiftSlot, Table};
use regex::Regex;

fn slot_header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*\d{1,2}\s*/\s*\d{1,2}\s*\(\s*(day|night)(\s+shift)?\s*\)\s*$")
            .expect("slot header pattern is valid")
    })
}

/// True if `header` looks like a shift column (`"28/11 (Day Shift)"`,
/// `"28/11 (night)"`, ...)
pub fn looks_like_slot(header: &str) -> bool {
    slot_header_pattern().is_match(header)
}

/// True if `header` is exactly the label of a slot in `calendar`
fn in_calendar(header: &str, calendar: &ShiftCalendar) -> bool {
    ShiftSlot::parse_label(header).is_some_and(|slot| calendar.contains(&slot))
}

/// Warn about shift-like prior-day columns that match no calendar slot
pub fn scan_prior_day_headers(table: &Table, calendar: &ShiftCalendar) -> Vec<Diagnostic> {
    table
        .header
        .iter()
        .map(|cell| cell.to_text())
        .filter(|header| looks_like_slot(header) && !in_calendar(header, calendar))
        .map(|header| {
            Diagnostic::new(
                DiagnosticCode::W004StalePriorDayColumn,
                format!("prior-day column '{}' is not in the shift calendar", header.trim()),
            )
            .with_sheet(table.name.clone())
            .with_note("values in this column are ignored")
        })
        .collect()
}
