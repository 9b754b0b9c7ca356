//! Run configuration
//!
//! Optional TOML file passed with `--config`. Every section may be left out;
//! missing values fall back to the standard template.
//!
//! ```toml
//! [calendar]
//! start = "2024-11-28"
//! days = 12
//!
//! [layout.master]
//! header_row = 8
//! eq_tag = 46
//!
//! [layout.discipline]
//! progress_start = 11
//!
//! [output]
//! file_name = "max_progress_3ajna_output.xlsx"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use maxprog_core::{ShiftCalendar, WorkbookLayout, OUTPUT_FILE_NAME};
use serde::{Deserialize, Serialize};

/// Days covered when only `start` is given
const DEFAULT_DAYS: u32 = 12;

/// Longest calendar accepted from `days`
const MAX_DAYS: u32 = 366;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub layout: WorkbookLayout,
    pub output: OutputConfig,
}

/// Shift calendar: explicit date labels, or a start date and a day count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Date labels as printed in the sheets (e.g. "28/11")
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: OUTPUT_FILE_NAME.to_string(),
        }
    }
}

impl CalendarConfig {
    pub fn to_calendar(&self) -> Result<ShiftCalendar> {
        match (&self.start, self.dates.is_empty()) {
            (Some(_), false) => bail!("[calendar] sets both `start` and `dates`; use one"),
            (Some(start), true) => {
                let days = self.days.unwrap_or(DEFAULT_DAYS);
                if !(1..=MAX_DAYS).contains(&days) {
                    bail!("[calendar] `days` must be between 1 and {MAX_DAYS}, got {days}");
                }
                ShiftCalendar::from_start(*start, days).with_context(|| {
                    format!("[calendar] {days} days from {start} run past the last supported date")
                })
            }
            (None, false) => Ok(ShiftCalendar::from_dates(self.dates.iter().cloned())),
            (None, true) => {
                if self.days.is_some() {
                    bail!("[calendar] `days` needs a `start` date");
                }
                Ok(ShiftCalendar::default())
            }
        }
    }
}

impl Config {
    /// Read a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Configuration file content for `init-config`, with the calendar spelled out
    pub fn default_toml() -> Result<String> {
        let config = Config {
            calendar: CalendarConfig {
                dates: ShiftCalendar::default().dates(),
                ..Default::default()
            },
            ..Default::default()
        };
        Ok(toml::to_string_pretty(&config)?)
    }
}
