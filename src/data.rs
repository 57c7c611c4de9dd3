//! Data commands: per-cell transforms scoped to the selected rows.
//!
//! Every cell is read into a bounded scratch buffer, transformed and
//! written back. Writing can change the buffer length, so each row is
//! located again from scratch on every iteration.

use tracing::debug;

use crate::error::{Result, SheetError};
use crate::table::{Index, Table};

/// An in-place rewrite of a single cell's text.
pub trait CellTransform {
    fn apply(&self, cell: &mut Vec<u8>);

    /// The display name of this transform.
    fn name(&self) -> &str;
}

/// `toupper` - ASCII upper case.
pub struct Upper;

impl CellTransform for Upper {
    fn apply(&self, cell: &mut Vec<u8>) {
        cell.make_ascii_uppercase();
    }

    fn name(&self) -> &str {
        "toupper"
    }
}

/// `tolower` - ASCII lower case.
pub struct Lower;

impl CellTransform for Lower {
    fn apply(&self, cell: &mut Vec<u8>) {
        cell.make_ascii_lowercase();
    }

    fn name(&self) -> &str {
        "tolower"
    }
}

/// `round` - nearest integer, halves away from zero.
pub struct Round;

impl CellTransform for Round {
    fn apply(&self, cell: &mut Vec<u8>) {
        if let Some(value) = parse_number(cell) {
            *cell = (value.round() as i64).to_string().into_bytes();
        }
    }

    fn name(&self) -> &str {
        "round"
    }
}

/// `int` - drop the fractional part.
pub struct Truncate;

impl CellTransform for Truncate {
    fn apply(&self, cell: &mut Vec<u8>) {
        if let Some(value) = parse_number(cell) {
            *cell = (value.trunc() as i64).to_string().into_bytes();
        }
    }

    fn name(&self) -> &str {
        "int"
    }
}

/// Parse the whole cell as a finite decimal number.
///
/// An empty cell reads as zero. Leading ASCII whitespace is skipped;
/// anything left over after the number means the cell is not numeric and
/// stays untouched.
fn parse_number(cell: &[u8]) -> Option<f64> {
    if cell.is_empty() {
        return Some(0.0);
    }
    let text = std::str::from_utf8(cell)
        .ok()?
        .trim_start_matches(|c: char| c.is_ascii_whitespace());
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl Table {
    /// Run `transform` over column `col` of every selected row.
    pub fn apply_to_selected(&mut self, col: Index, transform: &dyn CellTransform) -> Result<()> {
        let col = self.existing_column(col)?;
        let rows = self.selection.selected_rows(self.row_count());
        debug!(col, rows = rows.len(), transform = transform.name(), "transforming column");

        let mut scratch = Vec::with_capacity(self.limits().max_cell_len);
        for row in rows {
            self.read_into(row, col, &mut scratch)?;
            transform.apply(&mut scratch);
            self.write_cell(row, col, &scratch)?;
        }
        Ok(())
    }

    /// `cset` - overwrite column `col` of every selected row with `text`.
    pub fn set_column(&mut self, col: Index, text: &str) -> Result<()> {
        let col = self.existing_column(col)?;
        let limit = self.limits().max_cell_len;
        if text.len() > limit {
            return Err(SheetError::TooLong { limit });
        }
        self.check_cell_text(text.as_bytes())?;

        for row in self.selection.selected_rows(self.row_count()) {
            self.write_cell(row, col, text.as_bytes())?;
        }
        Ok(())
    }

    /// `copy` - copy column `src` into column `dst` for every selected row.
    pub fn copy_column(&mut self, src: Index, dst: Index) -> Result<()> {
        let src = self.existing_column(src)?;
        let dst = self.existing_column(dst)?;

        let mut scratch = Vec::with_capacity(self.limits().max_cell_len);
        for row in self.selection.selected_rows(self.row_count()) {
            self.read_into(row, src, &mut scratch)?;
            self.write_cell(row, dst, &scratch)?;
        }
        Ok(())
    }

    /// `swap` - exchange columns `a` and `b` for every selected row.
    pub fn swap_columns(&mut self, a: Index, b: Index) -> Result<()> {
        let a = self.existing_column(a)?;
        let b = self.existing_column(b)?;

        let mut first = Vec::with_capacity(self.limits().max_cell_len);
        let mut second = Vec::with_capacity(self.limits().max_cell_len);
        for row in self.selection.selected_rows(self.row_count()) {
            self.read_into(row, a, &mut first)?;
            self.read_into(row, b, &mut second)?;
            self.write_cell(row, a, &second)?;
            self.write_cell(row, b, &first)?;
        }
        Ok(())
    }

    /// `move` - move column `src` so it sits before column `dst`.
    ///
    /// `dst` may be one past the last column, which moves `src` to the end.
    /// Done as adjacent swaps, so only selected rows move.
    pub fn move_column(&mut self, src: Index, dst: Index) -> Result<()> {
        let columns = self.column_count();
        let src = self.existing_column(src)?;
        let dst = dst.resolve(columns + 1)?;
        if dst > columns + 1 {
            return Err(SheetError::OutOfRange);
        }

        let end = if src < dst { dst - 1 } else { dst };
        debug!(src, dst, swaps = src.abs_diff(end), "moving column");

        let mut pos = src;
        while pos != end {
            let next = if pos < end { pos + 1 } else { pos - 1 };
            self.swap_columns(Index::from(pos), Index::from(next))?;
            pos = next;
        }
        Ok(())
    }

    /// Copy cell `(row, col)` into `scratch`, enforcing the per-cell bound.
    fn read_into(&self, row: usize, col: usize, scratch: &mut Vec<u8>) -> Result<()> {
        let cell = self.read_cell(row, col)?;
        let limit = self.limits().max_cell_len;
        if cell.len() > limit {
            return Err(SheetError::TooLong { limit });
        }
        scratch.clear();
        scratch.extend_from_slice(cell);
        Ok(())
    }
}
