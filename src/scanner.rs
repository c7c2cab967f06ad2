use std::collections::HashMap;
use std::io::{BufRead, Lines};

use tracing::trace;

use crate::domain::{COMMENT_MARKER, DEFAULT_TABLE_WIDTH, Result, TableError};

/// Column metadata collected by one pass over the source.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    comments: Vec<String>,
    skip_count: usize,
    column_names: Vec<String>,
    name_index: HashMap<String, usize>,
    row_count: usize,
    name_widths: Vec<usize>,
    data_widths: Vec<usize>,
    display_widths: Vec<usize>,
    pub(crate) max_table_width: usize,
}

impl Default for TableInfo {
    fn default() -> Self {
        Self {
            comments: Vec::new(),
            skip_count: 0,
            column_names: Vec::new(),
            name_index: HashMap::new(),
            row_count: 0,
            name_widths: Vec::new(),
            data_widths: Vec::new(),
            display_widths: Vec::new(),
            max_table_width: DEFAULT_TABLE_WIDTH,
        }
    }
}

impl TableInfo {
    /// Column names in column order.
    pub fn keys(&self) -> &[String] {
        &self.column_names
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Lines excluded from data retrieval: comments plus the column-defining row.
    pub fn skip_count(&self) -> usize {
        self.skip_count
    }

    /// Non-comment, non-blank lines including the column-defining row.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn data_row_count(&self) -> usize {
        self.row_count.saturating_sub(1)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn name_widths(&self) -> &[usize] {
        &self.name_widths
    }

    pub fn data_widths(&self) -> &[usize] {
        &self.data_widths
    }

    pub fn max_table_width(&self) -> usize {
        self.max_table_width
    }

    /// Per column max(name width, data width). Computed once and cached.
    pub(crate) fn display_widths(&mut self) -> &[usize] {
        if self.display_widths.len() != self.column_names.len() {
            self.display_widths = self
                .name_widths
                .iter()
                .zip(&self.data_widths)
                .map(|(n, d)| *n.max(d))
                .collect();
        }
        &self.display_widths
    }

    fn define_columns(&mut self, fields: Vec<String>, has_header: bool) {
        for (idx, field) in fields.into_iter().enumerate() {
            let name = if has_header {
                self.unique_name(field, idx)
            } else {
                idx.to_string()
            };
            self.name_widths.push(name.chars().count());
            self.name_index.insert(name.clone(), idx);
            self.column_names.push(name);
        }
        self.data_widths = vec![0; self.column_names.len()];
    }

    fn unique_name(&self, field: String, idx: usize) -> String {
        let mut name = field;
        while self.name_index.contains_key(&name) {
            name = format!("{name}.{idx}");
        }
        name
    }

    fn track_widths(&mut self, fields: &[String]) {
        for (width, field) in self.data_widths.iter_mut().zip(fields) {
            *width = (*width).max(field.chars().count());
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Record {
    Comment(String),
    /// The column-defining row, always the first non-comment line.
    Header(Vec<String>),
    Data(Vec<String>),
}

/// Splits a source into records. Blank lines are dropped, every row after the column-defining
/// row must have the same number of fields.
pub(crate) struct Records<R> {
    lines: Lines<R>,
    line_no: usize,
    delimiter: char,
    columns: Option<usize>,
}

impl<R: BufRead> Records<R> {
    pub(crate) fn new(reader: R, delimiter: char) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            delimiter,
            columns: None,
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with(COMMENT_MARKER) {
                return Some(Ok(Record::Comment(line)));
            }

            let fields = split_fields(&line, self.delimiter);
            return Some(match self.columns {
                None => {
                    self.columns = Some(fields.len());
                    Ok(Record::Header(fields))
                }
                Some(expected) if expected != fields.len() => Err(TableError::MalformedRow {
                    line: self.line_no,
                    expected,
                    found: fields.len(),
                }),
                Some(_) => Ok(Record::Data(fields)),
            });
        }
    }
}

pub(crate) fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(str::to_string).collect()
}

/// Build the table metadata in a single pass over `reader`.
pub(crate) fn scan<R: BufRead>(reader: R, has_header: bool, delimiter: char) -> Result<TableInfo> {
    let mut info = TableInfo::default();
    for record in Records::new(reader, delimiter) {
        match record? {
            Record::Comment(line) => {
                info.comments.push(line);
                info.skip_count += 1;
            }
            Record::Header(fields) => {
                info.define_columns(fields, has_header);
                info.skip_count += 1;
                info.row_count += 1;
            }
            Record::Data(fields) => {
                info.track_widths(&fields);
                info.row_count += 1;
            }
        }
    }
    trace!(
        "Scan: columns {:?}, name widths {:?}, data widths {:?}",
        info.column_names, info.name_widths, info.data_widths
    );
    Ok(info)
}
