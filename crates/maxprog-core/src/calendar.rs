//! Shift calendar
//!
//! The fixed, ordered set of (date, shift) buckets tracked for every activity.
//! The same ordering labels three things:
//! - discipline-sheet progress columns (by position)
//! - prior-day output columns (by header label)
//! - output report columns
//!
//! # Example
//!
//! ```rust
//! use maxprog_core::calendar::{Shift, ShiftCalendar};
//!
//! let calendar = ShiftCalendar::default();
//! assert_eq!(calendar.len(), 24);
//! assert_eq!(calendar.slots()[0].label(), "28/11 (Day Shift)");
//! assert_eq!(calendar.slots()[1].shift, Shift::Night);
//! assert_eq!(calendar.position("09/12 (Night Shift)"), Some(23));
//! ```

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Dates covered by the standard turnaround calendar
const DEFAULT_DATES: [&str; 12] = [
    "28/11", "29/11", "30/11", "01/12", "02/12", "03/12", "04/12", "05/12", "06/12", "07/12",
    "08/12", "09/12",
];

/// Half of a working day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Day,
    Night,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Day => "Day Shift",
            Shift::Night => "Night Shift",
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (date, shift) bucket
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// Date label as printed in the sheets (e.g. "28/11")
    pub date: String,
    pub shift: Shift,
}

impl ShiftSlot {
    pub fn new(date: impl Into<String>, shift: Shift) -> Self {
        Self {
            date: date.into(),
            shift,
        }
    }

    /// Column label, e.g. `28/11 (Day Shift)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.date, self.shift)
    }

    /// Parse a column label back into a slot.
    ///
    /// Returns `None` for anything that is not `"{date} (Day Shift)"` or
    /// `"{date} (Night Shift)"`.
    pub fn parse_label(text: &str) -> Option<Self> {
        let text = text.trim();
        let (date, rest) = text.rsplit_once(" (")?;
        let shift = match rest.strip_suffix(')')? {
            "Day Shift" => Shift::Day,
            "Night Shift" => Shift::Night,
            _ => return None,
        };
        let date = date.trim();
        if date.is_empty() {
            return None;
        }
        Some(Self::new(date, shift))
    }
}

impl std::fmt::Display for ShiftSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.date, self.shift)
    }
}

/// Ordered list of shift slots
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCalendar {
    slots: Vec<ShiftSlot>,
}

impl Default for ShiftCalendar {
    fn default() -> Self {
        Self::from_dates(DEFAULT_DATES)
    }
}

impl ShiftCalendar {
    /// Build a calendar from explicit slots (order is kept as given)
    pub fn new(slots: Vec<ShiftSlot>) -> Self {
        Self { slots }
    }

    /// Day and night slot for every date label, in order
    pub fn from_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = dates
            .into_iter()
            .flat_map(|date| {
                let date = date.into();
                [
                    ShiftSlot::new(date.clone(), Shift::Day),
                    ShiftSlot::new(date, Shift::Night),
                ]
            })
            .collect();
        Self { slots }
    }

    /// Consecutive calendar days starting at `start`, labelled `dd/mm`.
    ///
    /// Returns `None` if the range runs past the last representable date.
    pub fn from_start(start: NaiveDate, days: u32) -> Option<Self> {
        let dates = (0..i64::from(days))
            .map(|offset| {
                start
                    .checked_add_signed(Duration::days(offset))
                    .map(|date| date.format("%d/%m").to_string())
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self::from_dates(dates))
    }

    pub fn slots(&self) -> &[ShiftSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Distinct date labels in calendar order
    pub fn dates(&self) -> Vec<String> {
        let mut dates: Vec<String> = Vec::new();
        for slot in &self.slots {
            if dates.last() != Some(&slot.date) {
                dates.push(slot.date.clone());
            }
        }
        dates
    }

    /// Column labels in calendar order
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(ShiftSlot::label).collect()
    }

    /// Index of the slot with the given label
    pub fn position(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.slots.iter().position(|slot| slot.label() == label)
    }

    pub fn contains(&self, slot: &ShiftSlot) -> bool {
        self.slots.contains(slot)
    }
}
