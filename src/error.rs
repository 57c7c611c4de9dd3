//! Error types for table editing.

use thiserror::Error;

/// Everything that can stop a run.
///
/// The first error aborts the remaining command sequence. Mutations made by
/// earlier commands stay in memory but are never emitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SheetError {
    /// No commands were supplied at all.
    #[error("No commands found")]
    NotFound,

    /// An internal invariant was violated.
    #[error("Generic error: {0}")]
    Generic(&'static str),

    /// The buffer, row or cell bound would be exceeded.
    #[error("Maximum size exceeded (limit {limit})")]
    TooLong { limit: usize },

    /// Row or column coordinate outside the table.
    #[error("Given cell coordinates are out of range")]
    OutOfRange,

    /// Unknown command, bad parameter or bad delimiter set.
    #[error("Bad syntax: {0}")]
    BadSyntax(String),

    /// An edit would leave the table without columns, or the result is empty.
    #[error("Table cannot be empty")]
    TableEmpty,

    /// Command categories used in an illegal order.
    #[error("Commands are used in wrong order: {0}")]
    BadOrder(String),

    /// Input rows have different numbers of columns.
    #[error("Table has different numbers of columns in each row")]
    BadTable,
}

impl SheetError {
    /// Whether the CLI should follow the message with usage text.
    pub fn shows_usage(&self) -> bool {
        matches!(self, SheetError::NotFound | SheetError::BadOrder(_))
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let errors = [
            SheetError::NotFound,
            SheetError::Generic("x"),
            SheetError::TooLong { limit: 10 },
            SheetError::OutOfRange,
            SheetError::BadSyntax("x".to_string()),
            SheetError::TableEmpty,
            SheetError::BadOrder("x".to_string()),
            SheetError::BadTable,
        ];
        let mut messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_usage_hint_kinds() {
        assert!(SheetError::NotFound.shows_usage());
        assert!(SheetError::BadOrder("rows".to_string()).shows_usage());
        assert!(!SheetError::OutOfRange.shows_usage());
    }
}
