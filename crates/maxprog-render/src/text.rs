//! Plain-text report summary for the terminal

use std::fmt::Write;

use maxprog_core::{ProgressReport, RenderError, Renderer};

/// Renders one line per activity: ID, overall progress, filled slots
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// List every non-zero slot under its activity
    pub show_slots: bool,
    /// Truncate descriptions to this many characters (0 = hide)
    pub description_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_slots: false,
            description_width: 40,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(mut self) -> Self {
        self.show_slots = true;
        self
    }

    pub fn description_width(mut self, width: usize) -> Self {
        self.description_width = width;
        self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &ProgressReport) -> Result<String, RenderError> {
        let slots = report.calendar.len();
        let id_width = report
            .activities
            .iter()
            .map(|a| a.id.chars().count())
            .chain(std::iter::once("Activity".len()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let fmt_err = |e: std::fmt::Error| RenderError::Format(e.to_string());

        writeln!(
            out,
            "Max progress: {} activities, {} shift slots",
            report.len(),
            slots
        )
        .map_err(fmt_err)?;
        writeln!(out).map_err(fmt_err)?;

        write!(out, "{:<id_width$}  {:>8}  {:>7}", "Activity", "Overall", "Filled").map_err(fmt_err)?;
        if self.description_width > 0 {
            write!(out, "  Description").map_err(fmt_err)?;
        }
        writeln!(out).map_err(fmt_err)?;

        for activity in &report.activities {
            let filled = format!("{}/{}", activity.active_slots(), slots);
            write!(
                out,
                "{:<id_width$}  {:>8.2}  {:>7}",
                activity.id, activity.overall_progress, filled
            )
            .map_err(fmt_err)?;
            if self.description_width > 0 {
                let description: String = activity
                    .description
                    .to_text()
                    .chars()
                    .take(self.description_width)
                    .collect();
                write!(out, "  {description}").map_err(fmt_err)?;
            }
            writeln!(out).map_err(fmt_err)?;

            if self.show_slots {
                for (slot, value) in report.calendar.slots().iter().zip(&activity.shifts) {
                    if *value != 0.0 {
                        writeln!(out, "    {}: {:.2}", slot.label(), value).map_err(fmt_err)?;
                    }
                }
            }
        }

        writeln!(out).map_err(fmt_err)?;
        writeln!(out, "Total progress: {:.2}", report.total_progress()).map_err(fmt_err)?;

        Ok(out)
    }
}
