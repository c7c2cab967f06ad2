use std::io::{self, Write};

/// Columns wider than this are dropped from the preview once the table exceeds its width cap.
pub const COLUMN_WIDTH_COLLAPSE_THRESHOLD: usize = 30;
const COLUMN_SEPARATOR: &str = " | ";

/// A fixed-width text grid written to any `Write` sink.
pub(crate) struct Grid<'a, W: Write> {
    out: &'a mut W,
    widths: &'a [usize],
    visible: Vec<usize>,
    selected: usize,
    rule: String,
}

impl<'a, W: Write> Grid<'a, W> {
    /// `selection` lists the candidate column indices in render order.
    pub fn new(
        out: &'a mut W,
        widths: &'a [usize],
        selection: &[usize],
        max_width: usize,
    ) -> Self {
        let visible = visible_columns(widths, selection, max_width);
        Self {
            out,
            widths,
            visible,
            selected: selection.len(),
            rule: String::new(),
        }
    }

    pub fn header(&mut self, names: &[String]) -> io::Result<()> {
        let line = format_row(names, self.widths, &self.visible);
        self.rule = "-".repeat(line.chars().count());
        writeln!(self.out, "{}", self.rule)?;
        writeln!(self.out, "{line}")?;
        writeln!(self.out, "{}", self.rule)
    }

    pub fn row(&mut self, fields: &[String]) -> io::Result<()> {
        writeln!(self.out, "{}", format_row(fields, self.widths, &self.visible))
    }

    pub fn footer(&mut self, total_rows: usize, shown_rows: usize) -> io::Result<()> {
        writeln!(self.out, "{}", self.rule)?;
        writeln!(self.out, "{}", summary(total_rows, shown_rows))
    }

    /// Selected columns dropped by the width cap.
    pub fn hidden_columns(&self) -> usize {
        self.selected - self.visible.len()
    }
}

/// Width of a rendered row for the given columns: `| a | b |`.
pub(crate) fn row_width(widths: &[usize], columns: &[usize]) -> usize {
    1 + columns
        .iter()
        .map(|&c| widths[c] + COLUMN_SEPARATOR.len())
        .sum::<usize>()
}

/// Drop the very wide columns when the whole selection does not fit into `max_width`.
pub(crate) fn visible_columns(widths: &[usize], selection: &[usize], max_width: usize) -> Vec<usize> {
    if row_width(widths, selection) <= max_width {
        return selection.to_vec();
    }
    selection
        .iter()
        .copied()
        .filter(|&c| widths[c] <= COLUMN_WIDTH_COLLAPSE_THRESHOLD)
        .collect()
}

pub(crate) fn format_row(fields: &[String], widths: &[usize], visible: &[usize]) -> String {
    let mut line = String::from("|");
    for &c in visible {
        let field = fields.get(c).map(String::as_str).unwrap_or("");
        line.push(' ');
        line.push_str(&format!("{field:>width$}", width = widths[c]));
        line.push_str(" |");
    }
    line
}

pub(crate) fn summary(total_rows: usize, shown_rows: usize) -> String {
    if shown_rows < total_rows {
        format!("{total_rows} data rows (showing the first {shown_rows})")
    } else {
        format!("{total_rows} data rows")
    }
}
