//! Activity lookup per sheet
//!
//! Each input table is indexed once by cleaned activity ID. When an ID
//! appears on several rows of one sheet, only the first row counts.

use std::collections::HashMap;

use maxprog_core::{activity_id, ActivityId, Row, Table};

/// First row of every activity in one table
#[derive(Debug)]
pub struct SheetIndex<'a> {
    pub table: &'a Table,
    rows: HashMap<ActivityId, &'a Row>,
}

impl<'a> SheetIndex<'a> {
    /// Index `table` on its `id_column`; rows without an ID are skipped
    pub fn build(table: &'a Table, id_column: usize) -> Self {
        let mut rows = HashMap::with_capacity(table.rows.len());
        for row in &table.rows {
            let id = activity_id(row.cell(id_column));
            if !id.is_empty() {
                rows.entry(id).or_insert(row);
            }
        }
        Self { table, rows }
    }

    pub fn get(&self, id: &str) -> Option<&'a Row> {
        self.rows.get(id).copied()
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }

    /// Number of distinct activities in the sheet
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxprog_core::CellValue;

    #[test]
    fn first_row_wins_and_blanks_are_skipped() {
        let table = Table::new("civil.xlsx", vec![CellValue::from("ID")])
            .with_row(vec![CellValue::from("A1")])
            .with_row(vec![CellValue::Empty])
            .with_row(vec![CellValue::from("A 1")]);
        let index = SheetIndex::build(&table, 0);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("A1").map(|r| r.line), Some(2));
        assert!(index.get("").is_none());
    }
}
