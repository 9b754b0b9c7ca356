//! maxprog CLI - Maximum progress reconciliation
//!
//! Command-line interface for consolidating shift progress sheets into one
//! styled report.

mod config;
mod diagnostics;
mod progress;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use maxprog_core::{
    CollectingEmitter, Diagnostic, DiagnosticCode, DiagnosticEmitter, ProgressReport,
    ReconcileError, ReconcileInput, Reconciler, Renderer, OUTPUT_MIME,
};
use maxprog_parser::{load_discipline, load_master, load_prior_day, scan_prior_day_headers};
use maxprog_reconcile::MaxProgressReconciler;
use maxprog_render::{ExcelRenderer, TextRenderer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::diagnostics::{
    DiagnosticConfig, ExitCode, JsonEmitter, ReportingEmitter, TerminalEmitter,
};
use crate::progress::TerminalProgress;

#[derive(Parser)]
#[command(name = "maxprog")]
#[command(author, version, about = "Maximum progress reconciliation for shift progress sheets", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile progress sheets and write the consolidated workbook
    Run {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output file (defaults to the configured file name)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate and reconcile without writing anything
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Print the default configuration as TOML
    InitConfig {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Master progress sheet
    #[arg(long, value_name = "FILE")]
    master: PathBuf,

    /// Previous day's consolidated output
    #[arg(long = "prior-day", value_name = "FILE")]
    prior_day: Option<PathBuf>,

    /// Discipline progress sheet (repeatable)
    #[arg(short = 'd', long = "discipline", value_name = "FILE", num_args = 1..)]
    disciplines: Vec<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format for the summary and diagnostics
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,

    /// List every non-zero shift under its activity in the text summary
    #[arg(long)]
    slots: bool,

    /// Description column width in the text summary (0 hides it)
    #[arg(long, value_name = "CHARS", default_value_t = 40)]
    description_width: usize,
}

impl InputArgs {
    fn text_renderer(&self) -> TextRenderer {
        let renderer = TextRenderer::new().description_width(self.description_width);
        if self.slots {
            renderer.with_slots()
        } else {
            renderer
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { inputs, output } => cmd_reconcile(&inputs, Some(output)),
        Commands::Check { inputs } => cmd_reconcile(&inputs, None),
        Commands::InitConfig { output } => cmd_init_config(output.as_deref()),
    };

    match result {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::Failure.into()
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Shared by `run` and `check`; `output` is `None` for `check`, and
/// `Some(None)` for `run` without `-o`.
fn cmd_reconcile(inputs: &InputArgs, output: Option<Option<PathBuf>>) -> Result<ExitCode> {
    if inputs.disciplines.is_empty() {
        return Err(ReconcileError::NoDisciplineSheets.into());
    }

    let config = match &inputs.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let calendar = config.calendar.to_calendar()?;
    let reconciler = MaxProgressReconciler::new()
        .with_calendar(calendar)
        .with_layout(config.layout.clone());

    let mut collected = CollectingEmitter::new();
    let input = load_inputs(inputs, &reconciler, &mut collected)?;

    let diag_config = DiagnosticConfig::new(inputs.strict, inputs.quiet);
    let show_progress =
        inputs.format == OutputFormat::Text && !inputs.quiet && io::stderr().is_terminal();
    let mut progress = TerminalProgress::new(io::stderr(), show_progress);

    let report = match reconciler.reconcile(&input, &mut progress) {
        Ok(reconciliation) => {
            collected.extend(reconciliation.diagnostics);
            Some(reconciliation.report)
        }
        Err(err) => {
            collected.emit(Diagnostic::error(
                DiagnosticCode::E001InputRejected,
                err.to_string(),
            ));
            None
        }
    };

    // Errors, including warnings under --strict, leave no output behind
    let blocked = diag_config.error_count(&collected.diagnostics) > 0;
    let written = match (&report, output) {
        (Some(report), Some(path)) if !blocked => {
            let path = path.unwrap_or_else(|| PathBuf::from(&config.output.file_name));
            write_workbook(report, &path)?;
            Some(path)
        }
        (Some(_), Some(_)) => {
            info!("errors reported, output not written");
            None
        }
        _ => None,
    };

    let diagnostics = collected.diagnostics;
    match inputs.format {
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(io::stderr(), diag_config);
            let code = emit_all(&mut emitter, diagnostics);
            if let (Some(report), false) = (&report, inputs.quiet) {
                print!("{}", inputs.text_renderer().render(report)?);
                if let Some(path) = &written {
                    println!("Wrote {} ({OUTPUT_MIME})", path.display());
                }
            }
            Ok(code)
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(diag_config);
            let code = emit_all(&mut emitter, diagnostics);
            let value = serde_json::json!({
                "output": written.as_ref().map(|p| p.display().to_string()),
                "mime": OUTPUT_MIME,
                "report": report,
                "diagnostics": emitter.to_json_value(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(code)
        }
    }
}

fn load_inputs(
    inputs: &InputArgs,
    reconciler: &MaxProgressReconciler,
    diagnostics: &mut CollectingEmitter,
) -> Result<ReconcileInput> {
    let layout = &reconciler.layout;

    let master = load_master(&inputs.master, &layout.master)
        .with_context(|| format!("Failed to load master sheet: {}", inputs.master.display()))?;
    debug!(sheet = %master.name, rows = master.rows.len(), "loaded master sheet");
    let mut input = ReconcileInput::new(master);

    if let Some(path) = &inputs.prior_day {
        let table = load_prior_day(path, &layout.prior_day)
            .with_context(|| format!("Failed to load prior-day output: {}", path.display()))?;
        diagnostics.extend(scan_prior_day_headers(&table, &reconciler.calendar));
        input = input.prior_day(table);
    }

    for path in &inputs.disciplines {
        let table = load_discipline(path, &layout.discipline)
            .with_context(|| format!("Failed to load discipline sheet: {}", path.display()))?;
        debug!(sheet = %table.name, rows = table.rows.len(), "loaded discipline sheet");
        input = input.discipline(table);
    }

    Ok(input)
}

fn write_workbook(report: &ProgressReport, path: &Path) -> Result<()> {
    ExcelRenderer::new()
        .write_to(report, path)
        .with_context(|| format!("Failed to write output: {}", path.display()))?;
    info!(path = %path.display(), activities = report.len(), "wrote report");
    Ok(())
}

fn emit_all(emitter: &mut impl ReportingEmitter, diagnostics: Vec<Diagnostic>) -> ExitCode {
    for diagnostic in diagnostics {
        emitter.emit(diagnostic);
    }
    emitter.exit_code()
}

fn cmd_init_config(output: Option<&Path>) -> Result<ExitCode> {
    let content = Config::default_toml()?;
    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(ExitCode::Success)
}
