//! Comma-separated tables without quoting

use std::fs::{File, OpenOptions};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Header plus rows of a comma-separated file, all values as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header row
    pub columns: Vec<String>,
    /// Data rows, each with exactly `columns.len()` values
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with a header and no rows.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Read a header-first CSV file. Quoting is not interpreted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRegistry`] if the file does not exist,
    /// [`Error::MalformedRegistry`] if it is empty or a row's arity differs
    /// from the header's, and IO/CSV errors otherwise.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingRegistry {
                path: path.to_path_buf(),
            });
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_path(path)?;

        let mut records = reader.records();
        let columns: Vec<String> = match records.next() {
            Some(header) => header?.iter().map(str::to_string).collect(),
            None => {
                return Err(Error::MalformedRegistry {
                    path: path.to_path_buf(),
                    reason: "file is empty".to_string(),
                })
            }
        };

        let mut rows = Vec::new();
        for (idx, record) in records.enumerate() {
            let record = record?;
            if record.len() != columns.len() {
                return Err(Error::MalformedRegistry {
                    path: path.to_path_buf(),
                    reason: format!(
                        "row {} has {} values, header has {}",
                        idx + 1,
                        record.len(),
                        columns.len()
                    ),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    /// The last row of the file: the last data row, or the header when
    /// there are no data rows.
    #[must_use]
    pub fn last_record(&self) -> &[String] {
        self.rows.last().map_or(self.columns.as_slice(), Vec::as_slice)
    }

    /// Overwrite `path` with this table.
    ///
    /// # Errors
    ///
    /// Returns IO/CSV errors from writing.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = unquoted_writer(File::create(path)?);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Copy of this table with an extra column, keeping `Sample,Time` first
    /// and sorting the remaining columns by name. Every existing row gets
    /// `default` in the new column.
    ///
    /// Returns `None` if the column already exists.
    #[must_use]
    pub fn with_sorted_column(&self, name: &str, default: &str) -> Option<Self> {
        if self.columns.iter().any(|c| c == name) {
            return None;
        }

        let fixed = self.columns.len().min(2);
        let mut fields: Vec<&str> = self.columns[fixed..]
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(name))
            .collect();
        fields.sort_unstable();

        let columns: Vec<String> = self.columns[..fixed]
            .iter()
            .map(String::as_str)
            .chain(fields)
            .map(str::to_string)
            .collect();

        // Position of each new column in the old layout; `None` is the added one
        let layout: Vec<Option<usize>> = columns
            .iter()
            .map(|c| self.columns.iter().position(|old| old == c))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                layout
                    .iter()
                    .map(|idx| idx.map_or_else(|| default.to_string(), |i| row[i].clone()))
                    .collect()
            })
            .collect();

        Some(Self { columns, rows })
    }
}

/// Append one row to an existing CSV file.
///
/// # Errors
///
/// Returns IO/CSV errors from opening or writing the file.
pub(crate) fn append_record(path: &Path, record: &[String]) -> Result<()> {
    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = unquoted_writer(file);
    writer.write_record(record)?;
    writer.flush()?;
    Ok(())
}

fn unquoted_writer(file: File) -> csv::Writer<File> {
    WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(file)
}
