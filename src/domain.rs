use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;

use crate::sniff::Kind;

pub const DEFAULT_DELIMITER: char = ',';
pub const COMMENT_MARKER: char = '#';
pub const DEFAULT_TABLE_WIDTH: usize = 100;
pub const DEFAULT_PREVIEW_ROWS: i64 = 20;

pub type Result<T> = std::result::Result<T, TableError>;

/// Everything needed to open and scan a delimited text source.
#[derive(Debug, Clone, Setters)]
#[setters(into)]
pub struct TableConfig {
    pub path: PathBuf,
    /// Treat the column-defining row as names. When false, columns are named `0..n`.
    pub has_header: bool,
    pub delimiter: char,
    /// Soft cap on the width of a rendered preview row.
    pub max_table_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            has_header: true,
            delimiter: DEFAULT_DELIMITER,
            max_table_width: DEFAULT_TABLE_WIDTH,
        }
    }
}

/// Options for a single preview render.
#[derive(Debug, Clone, Setters)]
pub struct PreviewConfig {
    /// Restrict the grid to these columns, in table order.
    #[setters(strip_option)]
    pub columns: Option<Vec<String>>,
    /// Number of data rows to show, zero or negative shows all of them.
    pub max_rows: i64,
    /// Replaces the table's width cap when positive, zero keeps the stored cap.
    pub max_total_width: i64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            columns: None,
            max_rows: DEFAULT_PREVIEW_ROWS,
            max_total_width: 0,
        }
    }
}

#[derive(Debug)]
pub enum TableError {
    IoError(Error),
    SourceOpenFailed { path: PathBuf, source: Error },
    SourceNotOpen,
    UnknownColumn(String),
    TypeMismatch {
        column: String,
        row: usize,
        expected: &'static str,
        found: Kind,
    },
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    InvalidNumber(String),
    ParseFailed {
        column: String,
        row: usize,
        value: String,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::IoError(e) => write!(f, "i/o error: {e}"),
            TableError::SourceOpenFailed { path, source } => {
                write!(f, "cannot open {}: {source}", path.display())
            }
            TableError::SourceNotOpen => write!(f, "source is not open"),
            TableError::UnknownColumn(name) => write!(f, "unknown column \"{name}\""),
            TableError::TypeMismatch {
                column,
                row,
                expected,
                found,
            } => write!(
                f,
                "column \"{column}\" row {row}: expected {expected}, found {found:?}"
            ),
            TableError::MalformedRow {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} fields, found {found}"),
            TableError::InvalidNumber(text) => write!(f, "numeric value out of range: {text}"),
            TableError::ParseFailed { column, row, value } => {
                write!(f, "column \"{column}\" row {row}: cannot parse \"{value}\"")
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::IoError(e) => Some(e),
            TableError::SourceOpenFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<Error> for TableError {
    fn from(err: Error) -> Self {
        TableError::IoError(err)
    }
}
