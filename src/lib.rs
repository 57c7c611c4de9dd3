//! # sheet-rs
//!
//! An in-place editor for small delimited tables.
//!
//! The whole table lives in one bounded byte buffer, in the same form it was
//! read in: delimiter-separated cells, newline-terminated rows. Commands are
//! applied directly to those bytes by opening and closing gaps; there is no
//! parsed grid and no row index.
//!
//! ## Overview
//!
//! - **Layout commands** insert and delete rows and columns
//! - **Selection commands** narrow the set of rows later commands touch
//! - **Data commands** rewrite the cells of one column in the selected rows
//!
//! ## Example
//!
//! ```
//! use sheet_rs::{CommandRegistry, SheetConfig, edit_table};
//!
//! let config = SheetConfig::with_delimiters(",").unwrap();
//! let registry = CommandRegistry::standard();
//!
//! let report = edit_table(
//!     &registry,
//!     b"name,qty\nbolt,2.6\nnut,7.2\n",
//!     &["rows", "2", "-", "round", "2"],
//!     &config,
//! )
//! .unwrap();
//!
//! assert_eq!(report.output, b"name,qty\nbolt,3\nnut,7\n".to_vec());
//! ```

pub mod buffer;
pub mod config;
pub mod data;
pub mod dsl;
pub mod error;
pub mod input;
pub mod layout;
pub mod selection;
pub mod table;

pub use buffer::Buffer;
pub use config::{DEFAULT_DELIMITERS, Limits, SheetConfig};
pub use data::{CellTransform, Lower, Round, Truncate, Upper};
pub use dsl::{
    CommandKind, CommandRegistry, CommandSpec, Dispatcher, EditReport, Handler, Invocation,
    LAST_TOKEN, Phase, edit_table, execute_commands, parse_index,
};
pub use error::{Result, SheetError};
pub use input::load_table;
pub use selection::Selection;
pub use table::{Index, Table};
