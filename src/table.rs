//! The in-memory table and cell addressing.
//!
//! Layout of the buffer:
//! ```text
//! a,b,c\n1,2,3\n
//! ```
//! Cells are separated by the delimiter, rows end with `\n`, and the last row
//! is followed by nothing (the terminator). Row and column counts are never
//! cached; they are recomputed by scanning, so they always agree with the
//! bytes.

use std::ops::Range;

use crate::buffer::Buffer;
use crate::config::Limits;
use crate::error::{Result, SheetError};
use crate::selection::Selection;

/// A 1-based command parameter, or the sentinel for "last applicable".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    At(i64),
    Last,
}

impl Index {
    /// Resolve against `last`, the upper bound of the parameter's valid range.
    ///
    /// Only the lower bound is checked here; callers check the upper one.
    pub fn resolve(self, last: usize) -> Result<usize> {
        let value = match self {
            Index::Last => last,
            Index::At(n) => usize::try_from(n).map_err(|_| SheetError::OutOfRange)?,
        };
        if value < 1 {
            return Err(SheetError::OutOfRange);
        }
        Ok(value)
    }

    /// The raw value with `Last` replaced by `last`, unchecked.
    pub fn or_last(self, last: usize) -> i64 {
        match self {
            Index::At(n) => n,
            Index::Last => i64::try_from(last).unwrap_or(i64::MAX),
        }
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index::At(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// A delimited table edited in place.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) buffer: Buffer,
    delimiter: u8,
    pub(crate) selection: Selection,
    limits: Limits,
}

impl Table {
    /// Wrap already-normalized content. Every row starts selected.
    pub fn new(content: Vec<u8>, delimiter: u8, limits: Limits) -> Result<Self> {
        Ok(Self {
            buffer: Buffer::from_bytes(content, limits.capacity)?,
            delimiter,
            selection: Selection::all(limits.max_rows),
            limits,
        })
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }

    pub fn row_count(&self) -> usize {
        self.as_bytes().iter().filter(|&&b| b == b'\n').count()
    }

    /// Columns in the first row.
    pub fn column_count(&self) -> usize {
        let first_row = self
            .as_bytes()
            .split(|&b| b == b'\n')
            .next()
            .unwrap_or_default();
        1 + first_row.iter().filter(|&&b| b == self.delimiter).count()
    }

    /// Whether every complete row has the same number of fields.
    pub fn is_rectangular(&self) -> bool {
        let mut expected = None;
        let mut col = 1;
        for &b in self.as_bytes() {
            if b == self.delimiter {
                col += 1;
            } else if b == b'\n' {
                if *expected.get_or_insert(col) != col {
                    return false;
                }
                col = 1;
            }
        }
        true
    }

    /// Loose emptiness check: content sorts at or before a lone newline.
    ///
    /// This compares bytes the way `strcmp` would, so `""` and `"\n"` are
    /// empty, as is any content starting with a byte below `\n`.
    pub fn is_empty(&self) -> bool {
        self.as_bytes() <= b"\n".as_slice()
    }

    fn is_cell_end(&self, b: u8) -> bool {
        b == self.delimiter || b == b'\n'
    }

    /// Byte offset of the first character of cell `(row, col)`.
    ///
    /// `(row, columns + 1)` is the row's newline and `(rows + 1, 1)` is the
    /// terminator; both are valid so that appends have somewhere to go.
    pub fn locate_cell(&self, row: usize, col: usize) -> Result<usize> {
        if row < 1 || col < 1 {
            return Err(SheetError::OutOfRange);
        }

        let bytes = self.as_bytes();
        let mut current_row = 1;
        let mut current_col = 1;
        let mut offset = 0;

        while current_row < row || current_col < col {
            let b = *bytes.get(offset).ok_or(SheetError::OutOfRange)?;

            if b == self.delimiter {
                current_col += 1;
            } else if b == b'\n' {
                current_col += 1;
                if current_row == row {
                    if current_col == col {
                        break;
                    }
                    return Err(SheetError::OutOfRange);
                }
                current_row += 1;
                current_col = 1;
            }

            offset += 1;
        }

        Ok(offset)
    }

    /// Offset of the delimiter, newline or terminator ending the cell at `start`.
    pub(crate) fn cell_end(&self, start: usize) -> usize {
        let bytes = self.as_bytes();
        bytes[start.min(bytes.len())..]
            .iter()
            .position(|&b| self.is_cell_end(b))
            .map_or(bytes.len(), |len| start + len)
    }

    /// Byte range holding the text of `(row, col)`.
    pub fn cell_span(&self, row: usize, col: usize) -> Result<Range<usize>> {
        self.check_cell(row, col)?;
        let start = self.locate_cell(row, col)?;
        Ok(start..self.cell_end(start))
    }

    pub fn read_cell(&self, row: usize, col: usize) -> Result<&[u8]> {
        let span = self.cell_span(row, col)?;
        Ok(&self.as_bytes()[span])
    }

    /// Replace the text of `(row, col)`.
    ///
    /// The buffer is resized first, so a `TooLong` leaves the row as it was.
    /// Text holding the delimiter or a newline is refused.
    pub fn write_cell(&mut self, row: usize, col: usize, text: &[u8]) -> Result<()> {
        self.check_cell_text(text)?;
        let span = self.cell_span(row, col)?;
        let delta = text.len() as isize - span.len() as isize;
        self.buffer.shift(span.start, delta)?;
        self.buffer.write_at(span.start, text)
    }

    /// Resolve a column parameter that must name an existing column.
    pub(crate) fn existing_column(&self, col: Index) -> Result<usize> {
        let columns = self.column_count();
        let col = col.resolve(columns)?;
        if col > columns {
            return Err(SheetError::OutOfRange);
        }
        Ok(col)
    }

    /// A cell must not contain its own separators.
    pub(crate) fn check_cell_text(&self, text: &[u8]) -> Result<()> {
        if text.iter().any(|&b| b == self.delimiter() || b == b'\n') {
            return Err(SheetError::BadSyntax(format!(
                "cell text {:?} contains a delimiter or newline",
                String::from_utf8_lossy(text)
            )));
        }
        Ok(())
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<()> {
        if row < 1 || row > self.row_count() || col < 1 || col > self.column_count() {
            return Err(SheetError::OutOfRange);
        }
        Ok(())
    }
}
