use std::fs::File;
use std::io::{self, BufReader, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use tracing::{debug, error, info, instrument, trace};

use crate::domain::{PreviewConfig, Result, TableConfig, TableError};
use crate::scanner::{self, Record, Records, TableInfo};
use crate::sniff::{FromValue, classify};
use crate::ui::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Unopened,
    Ready,
}

/// A delimited text file with indexed column metadata.
///
/// Opening scans the file once to collect column names and widths. Every retrieval and preview
/// re-reads the file from the start, so only the metadata is held in memory.
#[derive(Debug, Default)]
pub struct Table {
    config: TableConfig,
    status: Status,
    source: Option<BufReader<File>>,
    info: TableInfo,
}

impl Table {
    /// Open and scan `path` right away unless it is empty.
    ///
    /// A file that cannot be opened or scanned is logged and leaves the table unopened, check
    /// [`Table::is_open`] before retrieving data.
    pub fn new(path: impl Into<PathBuf>, has_header: bool) -> Self {
        Self::from_config(TableConfig::default().path(path).has_header(has_header))
    }

    pub fn from_config(config: TableConfig) -> Self {
        let mut table = Self::unopened(config);
        if !table.config.path.as_os_str().is_empty()
            && let Err(e) = table.open()
        {
            error!("{e}");
        }
        table
    }

    /// Open and scan the configured path, returning the failure instead of logging it.
    pub fn try_from_config(config: TableConfig) -> Result<Self> {
        let mut table = Self::unopened(config);
        table.open()?;
        Ok(table)
    }

    fn unopened(config: TableConfig) -> Self {
        Self {
            config,
            status: Status::Unopened,
            source: None,
            info: TableInfo::default(),
        }
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.config.path = path.into();
    }

    pub fn set_delimiter(&mut self, delimiter: char) {
        self.config.delimiter = delimiter;
    }

    /// Soft cap on the width of preview rows.
    pub fn set_display_width(&mut self, width: usize) {
        self.config.max_table_width = width;
        self.info.max_table_width = width;
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Open the configured path and rebuild all metadata from a fresh scan.
    #[instrument(skip(self), fields(path = %self.config.path.display()))]
    pub fn open(&mut self) -> Result<()> {
        self.close();
        self.info = TableInfo::default();

        let file = File::open(&self.config.path).map_err(|source| TableError::SourceOpenFailed {
            path: self.config.path.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let start_time = Instant::now();
        let mut info =
            scanner::scan(&mut reader, self.config.has_header, self.config.delimiter)?;
        info.max_table_width = self.config.max_table_width;

        info!(
            "Event entries={} ({} columns, scanned in {}ms)",
            info.row_count(),
            info.keys().len(),
            start_time.elapsed().as_millis()
        );
        debug!("Columns: {:?}", info.keys());

        self.info = info;
        self.source = Some(reader);
        self.status = Status::Ready;
        Ok(())
    }

    /// Release the source. Metadata stays queryable; calling this twice is a no-op.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!("Closed {}", self.config.path.display());
        }
        self.status = Status::Unopened;
    }

    pub fn is_open(&self) -> bool {
        self.status == Status::Ready
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    pub fn row_count(&self) -> usize {
        self.info.row_count()
    }

    /// Number of values every column holds.
    pub fn data_row_count(&self) -> usize {
        self.info.data_row_count()
    }

    pub fn column_names(&self) -> &[String] {
        self.info.keys()
    }

    pub fn comments(&self) -> &[String] {
        self.info.comments()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.info
            .column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    fn rewind(&mut self) -> Result<Records<&mut BufReader<File>>> {
        let delimiter = self.config.delimiter;
        let reader = self.source.as_mut().ok_or(TableError::SourceNotOpen)?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Records::new(reader, delimiter))
    }

    /// All values of column `name` as raw text, in row order.
    #[instrument(skip(self))]
    pub fn get_column_as_text(&mut self, name: &str) -> Result<Vec<String>> {
        let idx = self.column_index(name)?;
        let mut values = Vec::with_capacity(self.data_row_count());
        for record in self.rewind()? {
            if let Record::Data(mut fields) = record? {
                values.push(fields.swap_remove(idx));
            }
        }
        trace!("Collected {} values", values.len());
        Ok(values)
    }

    /// Same as [`Table::get_column_as_text`].
    pub fn column(&mut self, name: &str) -> Result<Vec<String>> {
        self.get_column_as_text(name)
    }

    /// All values of column `name`, sniffed and converted to `T`.
    ///
    /// Fails with [`TableError::TypeMismatch`] on the first value whose sniffed type is not `T`.
    pub fn get_column_as<T: FromValue>(&mut self, name: &str) -> Result<Vec<T>> {
        self.get_column_as_text(name)?
            .iter()
            .enumerate()
            .map(|(row, text)| {
                T::from_value(classify(text)?).map_err(|found| TableError::TypeMismatch {
                    column: name.to_string(),
                    row,
                    expected: T::EXPECTED,
                    found: found.kind(),
                })
            })
            .collect()
    }

    /// All values of column `name` parsed with `T::from_str`, without sniffing.
    pub fn get_column_parsed<T: FromStr>(&mut self, name: &str) -> Result<Vec<T>> {
        self.get_column_as_text(name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.parse::<T>().map_err(|_| TableError::ParseFailed {
                    column: name.to_string(),
                    row,
                    value,
                })
            })
            .collect()
    }

    /// Print a bounded preview of the table to stdout.
    pub fn scan_preview(&mut self, preview: &PreviewConfig) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_preview(&mut out, preview)
    }

    /// Render a bounded preview grid into `out`.
    ///
    /// Comment lines are written first, followed by the column names framed as the header and
    /// at most `max_rows` data rows.
    #[instrument(skip(self, out))]
    pub fn render_preview<W: Write>(
        &mut self,
        out: &mut W,
        preview: &PreviewConfig,
    ) -> Result<()> {
        if !self.is_open() {
            return Err(TableError::SourceNotOpen);
        }
        if preview.max_total_width > 0 {
            self.set_display_width(preview.max_total_width as usize);
        }
        let selection = match &preview.columns {
            Some(names) => names
                .iter()
                .map(|name| self.column_index(name))
                .collect::<Result<Vec<usize>>>()?,
            None => (0..self.column_names().len()).collect(),
        };
        let widths = self.info.display_widths().to_vec();
        let names = self.column_names().to_vec();
        let total_rows = self.data_row_count();
        let max_width = self.info.max_table_width();

        for comment in self.comments() {
            writeln!(out, "{comment}")?;
        }

        let mut grid = Grid::new(out, &widths, &selection, max_width);
        let hidden = grid.hidden_columns();
        if hidden > 0 {
            debug!("Hiding {hidden} wide columns to fit {max_width} characters");
        }
        grid.header(&names)?;

        let mut shown = 0usize;
        for record in self.rewind()? {
            if let Record::Data(fields) = record? {
                if preview.max_rows > 0 && shown as i64 >= preview.max_rows {
                    break;
                }
                grid.row(&fields)?;
                shown += 1;
            }
        }
        grid.footer(total_rows, shown)?;
        Ok(())
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        self.close();
    }
}
