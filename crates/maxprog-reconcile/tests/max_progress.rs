//! Integration tests for maximum progress reconciliation
//!
//! Tables follow the standard template: master and discipline IDs in column
//! B, identifying fields at C/G/H/I/AU, discipline progress from column L,
//! prior-day columns found by header.

use std::collections::BTreeSet;

use maxprog_core::{
    CellValue, DiagnosticCode, NoProgress, ReconcileInput, Reconciler, Reconciliation,
    ShiftCalendar, Table, NOT_AVAILABLE,
};
use maxprog_reconcile::MaxProgressReconciler;
use pretty_assertions::assert_eq;

const SLOTS: usize = 24;
const PROGRESS_START: usize = 11;

fn text(s: &str) -> CellValue {
    CellValue::from(s)
}

fn master_row(id: &str, description: &str) -> Vec<CellValue> {
    let mut cells = vec![CellValue::Empty; 47];
    cells[1] = text(id);
    cells[2] = text(description);
    cells[6] = text("Unit 100");
    cells[7] = text("Mechanical");
    cells[8] = text("Fitter");
    cells[46] = text("P-101A");
    cells
}

fn master(ids: &[&str]) -> Table {
    let mut header = vec![CellValue::Empty; 47];
    header[1] = text("Activity ID");
    ids.iter().fold(Table::new("master.xlsx", header), |table, id| {
        table.with_row(master_row(id, &format!("Work on {id}")))
    })
}

fn discipline_header() -> Vec<CellValue> {
    let mut header = vec![CellValue::Empty; PROGRESS_START + SLOTS];
    header[1] = text("Activity ID");
    header
}

/// Discipline row with `values` placed at the given slot indices
fn discipline_row(id: &str, values: &[(usize, CellValue)]) -> Vec<CellValue> {
    let mut cells = vec![CellValue::Empty; PROGRESS_START + SLOTS];
    cells[1] = text(id);
    for (slot, value) in values {
        cells[PROGRESS_START + slot] = value.clone();
    }
    cells
}

fn discipline(name: &str, rows: Vec<Vec<CellValue>>) -> Table {
    rows.into_iter()
        .fold(Table::new(name, discipline_header()), Table::with_row)
}

fn prior_day(id: &str, values: &[(usize, f64)]) -> Table {
    let header = std::iter::once(text("Activity ID"))
        .chain(ShiftCalendar::default().labels().into_iter().map(CellValue::from))
        .collect();
    let mut cells = vec![CellValue::Number(0.0); SLOTS + 1];
    cells[0] = text(id);
    for (slot, value) in values {
        cells[1 + slot] = CellValue::Number(*value);
    }
    Table::new("yesterday.xlsx", header).with_row(cells)
}

fn run(input: &ReconcileInput) -> Reconciliation {
    MaxProgressReconciler::new()
        .reconcile(input, &mut NoProgress)
        .expect("reconciliation should succeed")
}

#[test]
fn single_discipline_end_to_end() {
    let civil = discipline("civil.xlsx", vec![discipline_row("A1", &[(0, CellValue::Number(0.5))])]);
    let input = ReconcileInput::new(master(&["A1"])).discipline(civil);

    let result = run(&input);
    let a1 = result.report.get("A1").expect("A1 present");

    let mut expected = vec![0.0; SLOTS];
    expected[0] = 0.5;
    assert_eq!(a1.shifts, expected);
    assert_eq!(a1.overall_progress, 0.5);
    assert_eq!(result.report.calendar.slots()[0].label(), "28/11 (Day Shift)");
}

#[test]
fn prior_day_is_a_floor_and_disciplines_raise_it() {
    let yesterday = prior_day("A1", &[(0, 0.4), (1, 0.3)]);
    let civil = discipline(
        "civil.xlsx",
        vec![discipline_row(
            "A1",
            &[(0, CellValue::Number(0.2)), (1, text("60%")), (2, CellValue::Number(0.1))],
        )],
    );
    let input = ReconcileInput::new(master(&["A1"]))
        .prior_day(yesterday)
        .discipline(civil);

    let a1 = run(&input).report.activities.remove(0);
    assert_eq!(&a1.shifts[..3], &[0.4, 0.6, 0.1]);
    assert_eq!(a1.overall_progress, 0.4 + 0.6 + 0.1);
}

#[test]
fn discipline_order_does_not_matter() {
    let civil = discipline(
        "civil.xlsx",
        vec![discipline_row("A1", &[(0, CellValue::Number(0.3)), (5, text("80%"))])],
    );
    let piping = discipline(
        "piping.xlsx",
        vec![discipline_row("A1", &[(0, CellValue::Number(0.7)), (5, CellValue::Number(0.2))])],
    );

    let forward = ReconcileInput::new(master(&["A1"]))
        .discipline(civil.clone())
        .discipline(piping.clone());
    let backward = ReconcileInput::new(master(&["A1"]))
        .discipline(piping)
        .discipline(civil);

    let a = run(&forward).report;
    let b = run(&backward).report;
    assert_eq!(a.activities, b.activities);
    assert_eq!(a.activities[0].shifts[0], 0.7);
    assert_eq!(a.activities[0].shifts[5], 0.8);
}

#[test]
fn output_ids_are_exactly_the_master_ids() {
    let civil = discipline(
        "civil.xlsx",
        vec![
            discipline_row("A1", &[(0, CellValue::Number(1.0))]),
            discipline_row("Z9", &[(0, CellValue::Number(1.0))]),
        ],
    );
    let input = ReconcileInput::new(master(&["C3", "A1", "B2", "A1"])).discipline(civil);

    let result = run(&input);
    let ids: Vec<_> = result.report.activities.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["C3", "A1", "B2"]);

    let unique: BTreeSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(result.report.get("Z9").is_none());
}

#[test]
fn overall_progress_equals_sum_of_shifts() {
    let civil = discipline(
        "civil.xlsx",
        vec![
            discipline_row(
                "A1",
                &[(0, CellValue::Number(0.1)), (3, text("25%")), (23, CellValue::Number(0.05))],
            ),
            discipline_row("B2", &[(7, CellValue::Number(1.5))]),
        ],
    );
    let input = ReconcileInput::new(master(&["A1", "B2"])).discipline(civil);

    for activity in run(&input).report.activities {
        let sum: f64 = activity.shifts.iter().sum();
        assert_eq!(activity.overall_progress, sum, "{}", activity.id);
        assert_eq!(activity.shifts.len(), SLOTS);
    }
}

#[test]
fn ids_match_regardless_of_whitespace() {
    let civil = discipline(
        "civil.xlsx",
        vec![discipline_row("A 123", &[(2, CellValue::Number(0.9))])],
    );
    let input = ReconcileInput::new(master(&["A123"])).discipline(civil);

    let result = run(&input);
    assert_eq!(result.report.activities[0].shifts[2], 0.9);
    assert_eq!(result.with_code(DiagnosticCode::W001ActivityNotReported).count(), 0);
}

#[test]
fn unreported_activity_keeps_row_and_warns() {
    let civil = discipline(
        "civil.xlsx",
        vec![discipline_row("A1", &[(0, CellValue::Number(0.5))])],
    );
    let yesterday = prior_day("A2", &[(4, 0.35)]);
    let input = ReconcileInput::new(master(&["A1", "A2", "A3"]))
        .prior_day(yesterday)
        .discipline(civil);

    let result = run(&input);

    let a2 = result.report.get("A2").expect("A2 still reported");
    assert_eq!(a2.shifts[4], 0.35);
    assert_eq!(a2.overall_progress, 0.35);

    let a3 = result.report.get("A3").expect("A3 still reported");
    assert_eq!(a3.overall_progress, 0.0);

    let warnings: Vec<_> = result
        .with_code(DiagnosticCode::W001ActivityNotReported)
        .map(|d| d.message.clone())
        .collect();
    assert_eq!(
        warnings,
        vec![
            "activity 'A2' not found in discipline sheets",
            "activity 'A3' not found in discipline sheets",
        ]
    );
}

#[test]
fn identifying_fields_come_from_master() {
    let civil = discipline("civil.xlsx", vec![]);
    let input = ReconcileInput::new(master(&["A1"])).discipline(civil);

    let a1 = run(&input).report.activities.remove(0);
    assert_eq!(a1.description, text("Work on A1"));
    assert_eq!(a1.location, text("Unit 100"));
    assert_eq!(a1.wp_owner, text("Mechanical"));
    assert_eq!(a1.lead_craft, text("Fitter"));
    assert_eq!(a1.eq_tag, text("P-101A"));
}

#[test]
fn repeated_master_id_keeps_position_and_takes_last_fields() {
    let mut header = vec![CellValue::Empty; 47];
    header[1] = text("Activity ID");
    let master = Table::new("master.xlsx", header)
        .with_row(master_row("A1", "first"))
        .with_row(master_row("B2", "other"))
        .with_row(master_row("A 1", "second"));
    let civil = discipline(
        "civil.xlsx",
        vec![discipline_row("A1", &[(0, CellValue::Number(0.5))])],
    );

    let result = run(&ReconcileInput::new(master).discipline(civil));
    let ids: Vec<_> = result.report.activities.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "B2"]);

    let a1 = &result.report.activities[0];
    assert_eq!(a1.description, text("second"));
    assert_eq!(a1.overall_progress, 0.5);

    let duplicates: Vec<_> = result
        .with_code(DiagnosticCode::W003DuplicateActivity)
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(
        duplicates[0].notes,
        vec!["identifying fields from row 2 are replaced by row 4".to_string()]
    );
}

#[test]
fn narrow_master_sheet_yields_not_available_eq_tag() {
    let mut header = vec![CellValue::Empty; 9];
    header[1] = text("Activity ID");
    let mut row = master_row("A1", "Short");
    row.truncate(9);
    let narrow = Table::new("master.xlsx", header).with_row(row);

    let input = ReconcileInput::new(narrow).discipline(discipline("civil.xlsx", vec![]));
    let a1 = run(&input).report.activities.remove(0);
    assert_eq!(a1.lead_craft, text("Fitter"));
    assert_eq!(a1.eq_tag, text(NOT_AVAILABLE));
}

#[test]
fn unparseable_cells_count_as_zero_and_are_reported() {
    let civil = discipline(
        "civil.xlsx",
        vec![discipline_row(
            "A1",
            &[(0, text("10.5.2")), (1, text("done")), (2, text("0")), (3, text(" "))],
        )],
    );
    let input = ReconcileInput::new(master(&["A1"])).discipline(civil);

    let result = run(&input);
    assert_eq!(result.report.activities[0].overall_progress, 0.0);

    let flagged: Vec<_> = result
        .with_code(DiagnosticCode::W002UnparseableProgress)
        .collect();
    assert_eq!(flagged.len(), 2);
    assert_eq!(flagged[0].cell.map(|c| c.to_string()), Some("L2".to_string()));
    assert!(flagged[0].message.contains("10.5.2"));
    assert!(flagged[1].message.contains("done"));
}

#[test]
fn first_matching_discipline_row_is_used() {
    let civil = discipline(
        "civil.xlsx",
        vec![
            discipline_row("A1", &[(0, CellValue::Number(0.2))]),
            discipline_row("A1", &[(0, CellValue::Number(0.9))]),
        ],
    );
    let input = ReconcileInput::new(master(&["A1"])).discipline(civil);
    assert_eq!(run(&input).report.activities[0].shifts[0], 0.2);
}

#[test]
fn prior_day_missing_slot_column_is_fatal() {
    let yesterday = Table::new("yesterday.xlsx", vec![text("Activity ID")])
        .with_row(vec![text("A1")]);
    let input = ReconcileInput::new(master(&["A1"]))
        .prior_day(yesterday)
        .discipline(discipline("civil.xlsx", vec![]));

    let err = MaxProgressReconciler::new()
        .reconcile(&input, &mut NoProgress)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "yesterday.xlsx: missing column '28/11 (Day Shift)'"
    );
}
