//! Row selection.
//!
//! Selection commands never replace the current selection, they intersect
//! with it. `rows 2 5 contains 1 x` therefore selects the rows in 2..=5
//! whose first cell contains `x`, whatever order the two are given in.

use tracing::debug;

use crate::error::{Result, SheetError};
use crate::table::{Index, Table};

/// One flag per row, 1-indexed. Slot 0 is unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    rows: Vec<bool>,
}

impl Selection {
    /// Every row up to `max_rows` selected.
    pub fn all(max_rows: usize) -> Self {
        Self {
            rows: vec![true; max_rows + 1],
        }
    }

    pub fn is_selected(&self, row: usize) -> bool {
        row >= 1 && self.rows.get(row).copied().unwrap_or(false)
    }

    /// AND `keep` into the flag for `row`.
    pub fn retain(&mut self, row: usize, keep: bool) {
        if let Some(flag) = self.rows.get_mut(row) {
            *flag = *flag && keep;
        }
    }

    /// Selected rows among the first `row_count`, in increasing order.
    pub fn selected_rows(&self, row_count: usize) -> Vec<usize> {
        (1..=row_count).filter(|&row| self.is_selected(row)).collect()
    }
}

fn begins_with(cell: &[u8], prefix: &[u8]) -> bool {
    cell.starts_with(prefix)
}

fn contains(cell: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || cell.windows(needle.len()).any(|window| window == needle)
}

impl Table {
    /// Keep rows in `[start, end]`.
    ///
    /// `end = Last` runs through the last row; `start = Last` means the last
    /// row itself, so `rows - -` selects only the final row.
    pub fn select_rows(&mut self, start: Index, end: Index) -> Result<()> {
        let row_count = self.row_count();
        let start = start.or_last(row_count);
        let end = end.or_last(row_count);

        if start > end {
            return Err(SheetError::BadSyntax(format!(
                "row range {start}..{end} is reversed"
            )));
        }
        if start < 1 || end > row_count as i64 {
            return Err(SheetError::OutOfRange);
        }

        debug!(start, end, "selecting row range");
        self.narrow_selection(|_, row| Ok(row as i64 >= start && row as i64 <= end))
    }

    /// Keep rows whose cell in `col` starts with `prefix`.
    pub fn select_begins_with(&mut self, col: Index, prefix: &str) -> Result<()> {
        let col = self.existing_column(col)?;
        debug!(col, prefix, "selecting rows by prefix");
        self.narrow_selection(|table, row| {
            Ok(begins_with(table.read_cell(row, col)?, prefix.as_bytes()))
        })
    }

    /// Keep rows whose cell in `col` contains `needle`.
    pub fn select_contains(&mut self, col: Index, needle: &str) -> Result<()> {
        let col = self.existing_column(col)?;
        debug!(col, needle, "selecting rows by substring");
        self.narrow_selection(|table, row| {
            Ok(contains(table.read_cell(row, col)?, needle.as_bytes()))
        })
    }

    /// Evaluate `predicate` on every row first, then intersect the verdicts.
    fn narrow_selection<F>(&mut self, mut predicate: F) -> Result<()>
    where
        F: FnMut(&Table, usize) -> Result<bool>,
    {
        let verdicts = (1..=self.row_count())
            .map(|row| predicate(self, row))
            .collect::<Result<Vec<bool>>>()?;

        for (row, keep) in (1..).zip(verdicts) {
            self.selection.retain(row, keep);
        }
        Ok(())
    }
}
