//! Terminal progress bar for reconciliation runs

use std::io::Write;

use maxprog_core::{progress_fraction, ProgressObserver};

const BAR_WIDTH: usize = 30;

/// Redraws a single status line on every update
pub struct TerminalProgress<W: Write> {
    writer: W,
    enabled: bool,
    last_percent: Option<usize>,
}

impl<W: Write> TerminalProgress<W> {
    pub fn new(writer: W, enabled: bool) -> Self {
        Self {
            writer,
            enabled,
            last_percent: None,
        }
    }

    fn draw(&mut self, completed: usize, total: usize) -> std::io::Result<()> {
        let fraction = progress_fraction(completed, total);
        let percent = (fraction * 100.0).round() as usize;
        if self.last_percent == Some(percent) {
            return Ok(());
        }
        self.last_percent = Some(percent);

        let filled = (fraction * BAR_WIDTH as f64).round() as usize;
        write!(
            self.writer,
            "\rReconciling [{}{}] {percent:>3}%",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled)
        )?;
        if completed >= total {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }
}

impl<W: Write> ProgressObserver for TerminalProgress<W> {
    fn on_progress(&mut self, completed: usize, total: usize) {
        if self.enabled {
            let _ = self.draw(completed, total);
        }
    }
}
