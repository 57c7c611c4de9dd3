//! Structural editing: inserting and deleting rows and columns.
//!
//! Each edit is expressed as gaps opened or closed through
//! [`Buffer::shift`](crate::buffer::Buffer::shift), so the table stays
//! rectangular and never outgrows its capacity.

use tracing::debug;

use crate::error::{Result, SheetError};
use crate::table::{Index, Table};

impl Table {
    /// Insert an empty row before `row`. `Last` appends.
    pub fn insert_row(&mut self, row: Index) -> Result<()> {
        let rows = self.row_count();
        let row = row.resolve(rows + 1)?;
        if row > rows + 1 {
            return Err(SheetError::OutOfRange);
        }
        if rows + 1 > self.limits().max_rows {
            return Err(SheetError::TooLong {
                limit: self.limits().max_rows,
            });
        }

        let columns = self.column_count();
        let offset = self.locate_cell(row, 1)?;
        self.buffer.shift(offset, columns as isize)?;

        let mut empty = vec![self.delimiter(); columns];
        empty[columns - 1] = b'\n';
        self.buffer.write_at(offset, &empty)?;

        debug!(row, columns, "inserted row");
        Ok(())
    }

    pub fn append_row(&mut self) -> Result<()> {
        self.insert_row(Index::Last)
    }

    /// Delete `row` including its newline.
    pub fn delete_row(&mut self, row: Index) -> Result<()> {
        let rows = self.row_count();
        let row = row.resolve(rows)?;
        if row > rows {
            return Err(SheetError::OutOfRange);
        }

        let start = self.locate_cell(row, 1)?;
        let len = self.as_bytes()[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|newline| newline + 1)
            .ok_or(SheetError::Generic("row without newline"))?;
        self.buffer.shift(start, -(len as isize))?;

        debug!(row, "deleted row");
        Ok(())
    }

    /// Delete rows `first..=last`.
    pub fn delete_rows(&mut self, first: Index, last: Index) -> Result<()> {
        let rows = self.row_count();
        let (first, last) = (first.or_last(rows), last.or_last(rows));
        if last < first {
            return Err(SheetError::BadSyntax(format!(
                "row range {first}..{last} is reversed"
            )));
        }
        for _ in first..=last {
            self.delete_row(Index::At(first))?;
        }
        Ok(())
    }

    /// Insert an empty column before `col`. `Last` appends.
    pub fn insert_column(&mut self, col: Index) -> Result<()> {
        let columns = self.column_count();
        let col = col.resolve(columns + 1)?;
        if col > columns + 1 {
            return Err(SheetError::OutOfRange);
        }

        // one byte per row; check the whole growth before touching any row
        let rows = self.row_count();
        let capacity = self.buffer.capacity();
        if self.buffer.len() + rows > capacity {
            return Err(SheetError::TooLong { limit: capacity });
        }

        for row in 1..=rows {
            let offset = self.locate_cell(row, col)?;
            self.buffer.shift(offset, 1)?;
            self.buffer.write_at(offset, &[self.delimiter()])?;
        }

        debug!(col, rows, "inserted column");
        Ok(())
    }

    pub fn append_column(&mut self) -> Result<()> {
        self.insert_column(Index::Last)
    }

    /// Delete column `col` from every row.
    ///
    /// The delimiter after the cell goes with it; for the last column the
    /// delimiter before it goes instead.
    pub fn delete_column(&mut self, col: Index) -> Result<()> {
        let col = self.existing_column(col)?;
        if self.column_count() == 1 {
            return Err(SheetError::TableEmpty);
        }

        for row in 1..=self.row_count() {
            let start = self.locate_cell(row, col)?;
            let end = self.cell_end(start);
            let followed_by_delimiter = self.buffer.get(end) == Some(self.delimiter());

            let gap_start = if followed_by_delimiter {
                start
            } else {
                start
                    .checked_sub(1)
                    .ok_or(SheetError::Generic("last column without delimiter"))?
            };
            let width = end - start + 1;
            self.buffer.shift(gap_start, -(width as isize))?;
        }

        debug!(col, "deleted column");
        Ok(())
    }

    /// Delete columns `first..=last`.
    pub fn delete_columns(&mut self, first: Index, last: Index) -> Result<()> {
        let columns = self.column_count();
        let (first, last) = (first.or_last(columns), last.or_last(columns));
        if last < first {
            return Err(SheetError::BadSyntax(format!(
                "column range {first}..{last} is reversed"
            )));
        }
        for _ in first..=last {
            self.delete_column(Index::At(first))?;
        }
        Ok(())
    }
}
