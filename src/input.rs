//! Loading raw input into a [`Table`].

use tracing::debug;

use crate::config::SheetConfig;
use crate::error::{Result, SheetError};
use crate::table::Table;

/// Build a table from raw input bytes.
///
/// Every configured delimiter is folded onto the first one, and trailing
/// newlines are normalized to exactly one. The result must fit the
/// configured limits and every row must have the same number of columns.
pub fn load_table(input: &[u8], config: &SheetConfig) -> Result<Table> {
    let delimiter = config.main_delimiter();
    let limits = config.limits;

    let mut content: Vec<u8> = input
        .iter()
        .map(|b| if config.delimiters.contains(b) { delimiter } else { *b })
        .collect();

    while content.last() == Some(&b'\n') {
        content.pop();
    }
    content.push(b'\n');

    if content.len() > limits.capacity {
        return Err(SheetError::TooLong {
            limit: limits.capacity,
        });
    }

    let table = Table::new(content, delimiter, limits)?;
    if table.row_count() > limits.max_rows {
        return Err(SheetError::TooLong {
            limit: limits.max_rows,
        });
    }
    if !table.is_rectangular() {
        return Err(SheetError::BadTable);
    }

    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        bytes = table.as_bytes().len(),
        "loaded table"
    );
    Ok(table)
}
