//! Run configuration: delimiter set and fixed size limits.

use crate::error::{Result, SheetError};

/// Delimiter set used when none is configured.
pub const DEFAULT_DELIMITERS: &str = " ";

/// Fixed bounds of the in-memory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum buffer length in bytes.
    pub capacity: usize,
    /// Maximum number of rows the selection can track.
    pub max_rows: usize,
    /// Scratch size for a single cell during data commands.
    pub max_cell_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            capacity: 10_240,
            max_rows: 200,
            max_cell_len: 100,
        }
    }
}

/// Everything needed to load and edit a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    /// Accepted input delimiters; the first one is kept in memory.
    pub delimiters: Vec<u8>,
    pub limits: Limits,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            delimiters: DEFAULT_DELIMITERS.as_bytes().to_vec(),
            limits: Limits::default(),
        }
    }
}

impl SheetConfig {
    /// Build a config from a delimiter set such as `",;"`.
    pub fn with_delimiters(delimiters: &str) -> Result<Self> {
        if delimiters.is_empty() {
            return Err(SheetError::BadSyntax("empty delimiter set".to_string()));
        }
        if delimiters.contains('\n') {
            return Err(SheetError::BadSyntax(
                "newline cannot be a delimiter".to_string(),
            ));
        }
        Ok(Self {
            delimiters: delimiters.as_bytes().to_vec(),
            ..Self::default()
        })
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The single delimiter byte stored in the buffer.
    pub fn main_delimiter(&self) -> u8 {
        self.delimiters.first().copied().unwrap_or(b' ')
    }
}
