//! Load a delimited text file into indexed column metadata, then pull single columns out of it
//! or print a bounded preview.
//!
//! ```no_run
//! use tabscan::Table;
//!
//! let mut table = Table::new("people.csv", true);
//! if table.is_open() {
//!     let names = table.get_column_as_text("name")?;
//!     let ages = table.get_column_as::<i64>("age")?;
//!     println!("{names:?} {ages:?}");
//! }
//! # Ok::<(), tabscan::TableError>(())
//! ```

mod domain;
mod scanner;
mod sniff;
mod table;
mod ui;

pub use domain::{
    COMMENT_MARKER, DEFAULT_DELIMITER, DEFAULT_PREVIEW_ROWS, DEFAULT_TABLE_WIDTH, PreviewConfig,
    Result, TableConfig, TableError,
};
pub use scanner::TableInfo;
pub use sniff::{FromValue, Kind, Value, classify};
pub use table::{Status, Table};
pub use ui::COLUMN_WIDTH_COLLAPSE_THRESHOLD;
