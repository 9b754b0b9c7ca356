//! Cell normalization
//!
//! Progress sheets are filled in by hand, so a progress cell may hold a
//! number, a percentage string (`"45%"`), free text, or nothing at all.
//! Normalization is total: every cell becomes a finite `f64`, and anything
//! that cannot be read as a number counts as zero.
//!
//! `classify` keeps the distinction between a blank cell and a cell that was
//! filled with something unreadable, so callers can report the latter
//! without changing the numeric outcome.
//!
//! # Example
//!
//! ```rust
//! use maxprog_core::cell::{classify, normalize, CellValue, Normalized};
//!
//! assert_eq!(normalize(&CellValue::from("45%")), 0.45);
//! assert_eq!(normalize(&CellValue::from("")), 0.0);
//! assert_eq!(normalize(&CellValue::Empty), 0.0);
//! assert_eq!(normalize(&CellValue::from("abc")), 0.0);
//! assert_eq!(
//!     classify(&CellValue::from("10.5.2")),
//!     Normalized::Unparseable("10.5.2".into())
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Content of one spreadsheet cell, independent of the file format
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Excel date serial
    DateTime(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form as it would appear in a CSV export.
    ///
    /// Whole numbers print without a fractional part, so an ID typed as
    /// `123` and stored as `123.0` reads back as `"123"`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) | CellValue::DateTime(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Outcome of reading a progress cell
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    /// Nothing entered
    Blank,
    /// A usable number
    Value(f64),
    /// Something was entered but it is not a number; counts as zero
    Unparseable(String),
}

impl Normalized {
    /// Numeric outcome (unparseable and blank cells are zero)
    pub fn value(&self) -> f64 {
        match self {
            Normalized::Value(v) => *v,
            Normalized::Blank | Normalized::Unparseable(_) => 0.0,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, Normalized::Unparseable(_))
    }
}

/// Classify a cell as blank, numeric or unparseable
pub fn classify(value: &CellValue) -> Normalized {
    match value {
        CellValue::Empty => Normalized::Blank,
        CellValue::Number(n) => {
            if n.is_finite() {
                Normalized::Value(*n)
            } else {
                // NaN is how a missing value survives a numeric export
                Normalized::Blank
            }
        }
        CellValue::Bool(b) => Normalized::Value(if *b { 1.0 } else { 0.0 }),
        CellValue::DateTime(_) => Normalized::Unparseable(value.to_text()),
        CellValue::Text(s) => classify_text(s),
    }
}

fn classify_text(raw: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Normalized::Blank;
    }

    let parsed = if trimmed.contains('%') {
        parse_finite(trimmed.trim_matches('%')).map(|v| v / 100.0)
    } else {
        parse_finite(trimmed)
    };

    match parsed {
        Some(v) => Normalized::Value(v),
        None => Normalized::Unparseable(raw.to_string()),
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Convert a cell to a progress fraction; never fails
pub fn normalize(value: &CellValue) -> f64 {
    classify(value).value()
}

/// Activity ID of a cell with all whitespace removed
pub fn activity_id(value: &CellValue) -> String {
    value.to_text().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strip whitespace from every ID in `column` (header left untouched).
///
/// Rows too short to reach `column` are left as they are.
pub fn clean_ids(mut table: Table, column: usize) -> Table {
    for row in &mut table.rows {
        if let Some(cell) = row.cells.get_mut(column) {
            if !matches!(cell, CellValue::Empty) {
                *cell = CellValue::Text(activity_id(cell));
            }
        }
    }
    table
}
