//! End-to-end tests for the `maxprog` binary
//!
//! Fixture workbooks are generated per test in a temp directory, laid out
//! like the standard template: header on row 9, IDs in column B, master
//! fields at C/G/H/I/AU, discipline progress from column L.
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success (warnings allowed) |
//! | 1 | Errors, fatal input problems, or warnings under `--strict` |

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

const HEADER_ROW: u32 = 8;

fn maxprog() -> Command {
    Command::new(env!("CARGO_BIN_EXE_maxprog"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    maxprog()
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to execute maxprog")
}

fn write_master(path: &Path, ids: &[&str]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write(0, 0, "Master progress").unwrap();
    sheet.write(HEADER_ROW, 1, "Activity ID").unwrap();
    sheet.write(HEADER_ROW, 2, "Description").unwrap();
    sheet.write(HEADER_ROW, 46, "Eq Tag").unwrap();
    for (i, id) in ids.iter().enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        sheet.write(row, 1, *id).unwrap();
        sheet.write(row, 2, format!("Work on {id}")).unwrap();
        sheet.write(row, 6, "Unit 100").unwrap();
        sheet.write(row, 7, "MECH").unwrap();
        sheet.write(row, 8, "Fitter").unwrap();
        sheet.write(row, 46, "P-101A").unwrap();
    }
    workbook.save(path).unwrap();
}

/// Discipline sheet with one activity and `(slot index, value)` pairs
fn write_discipline(path: &Path, id: &str, values: &[(u16, f64)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write(HEADER_ROW, 1, "Activity ID").unwrap();
    // Last progress column, so the sheet is wide enough for the calendar
    sheet.write(HEADER_ROW, 11 + 23, "09/12 N").unwrap();
    sheet.write(HEADER_ROW + 1, 1, id).unwrap();
    for (slot, value) in values {
        sheet.write(HEADER_ROW + 1, 11 + slot, *value).unwrap();
    }
    workbook.save(path).unwrap();
}

fn write_prior_day(path: &Path, id: &str, first_slot: f64, extra_header: Option<&str>) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write(0, 0, "Activity ID").unwrap();
    let labels = standard_labels();
    for (i, label) in labels.iter().enumerate() {
        sheet.write(0, 1 + i as u16, label.as_str()).unwrap();
    }
    sheet.write(1, 0, id).unwrap();
    sheet.write(1, 1, first_slot).unwrap();
    if let Some(header) = extra_header {
        sheet.write(0, 1 + labels.len() as u16, header).unwrap();
    }
    workbook.save(path).unwrap();
}

/// Labels of the standard calendar
fn standard_labels() -> Vec<String> {
    [
        "28/11", "29/11", "30/11", "01/12", "02/12", "03/12", "04/12", "05/12", "06/12", "07/12",
        "08/12", "09/12",
    ]
    .iter()
    .flat_map(|d| [format!("{d} (Day Shift)"), format!("{d} (Night Shift)")])
    .collect()
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        write_master(&dir.path().join("master.xlsx"), &["A1", "A2"]);
        write_discipline(&dir.path().join("civil.xlsx"), "A1", &[(0, 0.5)]);
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        run(self.dir.path(), args)
    }
}

fn read_output(path: &Path) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.worksheet_range("Sheet1").unwrap()
}

#[test]
fn run_writes_default_output_file() {
    let fx = Fixture::new();
    let output = fx.run(&["run", "--master", "master.xlsx", "--discipline", "civil.xlsx"]);

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));

    let range = read_output(&fx.path("max_progress_3ajna_output.xlsx"));
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("Activity ID".into())));
    assert_eq!(range.get_value((0, 7)), Some(&Data::String("28/11 (Day Shift)".into())));
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("A1".into())));
    assert_eq!(range.get_value((1, 5)), Some(&Data::String("P-101A".into())));
    assert_eq!(range.get_value((1, 6)), Some(&Data::Float(0.5)));
    assert_eq!(range.get_value((1, 7)), Some(&Data::Float(0.5)));
    assert_eq!(range.get_value((2, 0)), Some(&Data::String("A2".into())));
    assert_eq!(range.get_value((2, 6)), Some(&Data::Float(0.0)));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Max progress: 2 activities, 24 shift slots"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[W001]: activity 'A2' not found in discipline sheets"));
}

#[test]
fn prior_day_is_kept_as_floor() {
    let fx = Fixture::new();
    write_prior_day(&fx.path("yesterday.xlsx"), "A2", 0.4, Some("27/11 (Night Shift)"));

    let output = fx.run(&[
        "run",
        "--master",
        "master.xlsx",
        "--prior-day",
        "yesterday.xlsx",
        "-d",
        "civil.xlsx",
        "-o",
        "today.xlsx",
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));

    let range = read_output(&fx.path("today.xlsx"));
    assert_eq!(range.get_value((2, 0)), Some(&Data::String("A2".into())));
    assert_eq!(range.get_value((2, 7)), Some(&Data::Float(0.4)));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[W004]"));
    assert!(stderr.contains("27/11 (Night Shift)"));
}

#[test]
fn missing_discipline_sheet_is_fatal_and_writes_nothing() {
    let fx = Fixture::new();
    let output = fx.run(&["run", "--master", "master.xlsx"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please provide at least one discipline progress sheet"));
    assert!(!fx.path("max_progress_3ajna_output.xlsx").exists());
}

#[test]
fn strict_mode_fails_on_warnings() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "check",
        "--master",
        "master.xlsx",
        "-d",
        "civil.xlsx",
        "--strict",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error[W001]"));
}

#[test]
fn strict_run_with_warnings_writes_nothing() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "run",
        "--master",
        "master.xlsx",
        "-d",
        "civil.xlsx",
        "--strict",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error[W001]"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Wrote"));
    assert!(!fx.path("max_progress_3ajna_output.xlsx").exists());
}

#[test]
fn strict_run_without_warnings_still_writes() {
    let dir = TempDir::new().unwrap();
    write_master(&dir.path().join("master.xlsx"), &["A1"]);
    write_discipline(&dir.path().join("civil.xlsx"), "A1", &[(0, 0.5)]);

    let output = run(
        dir.path(),
        &["run", "--master", "master.xlsx", "-d", "civil.xlsx", "--strict"],
    );
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("max_progress_3ajna_output.xlsx").exists());
}

#[test]
fn slots_flag_lists_shift_values() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "check",
        "--master",
        "master.xlsx",
        "-d",
        "civil.xlsx",
        "--slots",
        "--description-width",
        "0",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("    28/11 (Day Shift): 0.50"));
    assert!(!stdout.contains("Description"));
}

#[test]
fn check_writes_no_output() {
    let fx = Fixture::new();
    let output = fx.run(&["check", "--master", "master.xlsx", "-d", "civil.xlsx", "--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
    assert!(!fx.path("max_progress_3ajna_output.xlsx").exists());
}

#[test]
fn json_format_reports_activities_and_diagnostics() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "check",
        "--master",
        "master.xlsx",
        "-d",
        "civil.xlsx",
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["output"], serde_json::Value::Null);
    assert_eq!(value["mime"], "application/vnd.ms-excel");
    assert_eq!(value["report"]["activities"][0]["id"], "A1");
    assert_eq!(value["report"]["activities"][0]["overall_progress"], 0.5);

    let codes: Vec<_> = value["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap().to_string())
        .collect();
    assert!(codes.contains(&"W001".to_string()));
    assert!(codes.contains(&"I002".to_string()));
}

#[test]
fn narrow_discipline_sheet_is_rejected() {
    let fx = Fixture::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write(HEADER_ROW, 1, "Activity ID").unwrap();
    sheet.write(HEADER_ROW + 1, 1, "A1").unwrap();
    sheet.write(HEADER_ROW + 1, 11, 0.5).unwrap();
    workbook.save(fx.path("narrow.xlsx")).unwrap();

    let output = fx.run(&["run", "--master", "master.xlsx", "-d", "narrow.xlsx"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[E001]"));
    assert!(stderr.contains("narrow.xlsx: expected at least 35 columns, found 12"));
    assert!(!fx.path("max_progress_3ajna_output.xlsx").exists());
}

#[test]
fn unreadable_file_names_the_file() {
    let fx = Fixture::new();
    let output = fx.run(&["run", "--master", "missing.xlsx", "-d", "civil.xlsx"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load master sheet: missing.xlsx"));
}

#[test]
fn config_file_changes_calendar() {
    let fx = Fixture::new();
    std::fs::write(
        fx.path("maxprog.toml"),
        "[calendar]\ndates = [\"28/11\"]\n\n[output]\nfile_name = \"short.xlsx\"\n",
    )
    .unwrap();

    let output = fx.run(&[
        "run",
        "--master",
        "master.xlsx",
        "-d",
        "civil.xlsx",
        "--config",
        "maxprog.toml",
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));

    let range = read_output(&fx.path("short.xlsx"));
    assert_eq!(range.get_size(), (3, 9));
    assert_eq!(range.get_value((0, 8)), Some(&Data::String("28/11 (Night Shift)".into())));
}

#[test]
fn init_config_prints_defaults() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["init-config"]);
    assert_eq!(output.status.code(), Some(0));

    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("[layout.master]"));
    assert!(text.contains("eq_tag = 46"));
    assert!(text.contains("\"28/11\""));
    assert!(text.contains("file_name = \"max_progress_3ajna_output.xlsx\""));
}
