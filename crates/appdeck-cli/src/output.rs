//! Output renderers and formatting helpers for CLI commands.

use std::fmt::{self, Display, Formatter};

use appdeck_api_models::{Application, LogEntry};

const CELL_PADDING: usize = 1;
const DELIMITER: char = '|';

/// Headers used by `app-list`.
pub const APPLICATION_HEADERS: [&str; 3] = ["Application", "State", "Ip"];

/// Aligned text table with a fixed header row.
///
/// Every line renders as `| cell | cell |`, each cell left-aligned and padded to
/// the widest value in its column. Rows keep insertion order and cells are
/// never truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Start a table with the given header row.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row.
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Render the table as bytes ready for an output stream.
    #[must_use]
    pub fn render(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.column_count()];
        for line in std::iter::once(&self.headers).chain(&self.rows) {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn write_line(
        formatter: &mut Formatter<'_>,
        widths: &[usize],
        cells: &[String],
    ) -> fmt::Result {
        for (index, width) in widths.iter().enumerate() {
            let cell = cells.get(index).map_or("", String::as_str);
            let fill = width - cell.chars().count() + CELL_PADDING;
            write!(
                formatter,
                "{DELIMITER}{pad}{cell}{fill}",
                pad = " ".repeat(CELL_PADDING),
                fill = " ".repeat(fill)
            )?;
        }
        writeln!(formatter, "{DELIMITER}")
    }
}

impl Display for Table {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        Self::write_line(formatter, &widths, &self.headers)?;
        for row in &self.rows {
            Self::write_line(formatter, &widths, row)?;
        }
        Ok(())
    }
}

/// Build the `app-list` table: one row per application, first unit's IP.
#[must_use]
pub fn application_table(apps: &[Application]) -> Table {
    let mut table = Table::new(APPLICATION_HEADERS);
    for app in apps {
        table.add_row([app.name.as_str(), app.state.as_str(), app.primary_ip()]);
    }
    table
}

/// Render log entries as `<timestamp> - <message>` lines in received order.
#[must_use]
pub fn render_log_lines(entries: &[LogEntry]) -> String {
    entries.iter().map(|entry| format!("{entry}\n")).collect()
}
