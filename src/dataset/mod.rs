//! In-memory listings table.
//!
//! A `Dataset` keeps the header exactly as read plus the raw string records.
//! Cells are interpreted on demand: numeric accessors parse per column, and an
//! empty or unparseable cell reads as a missing value rather than an error.
//! Keeping the raw text means a filter-only transformation writes untouched
//! cells back byte for byte.

mod io;
pub mod schema;


use crate::error::{PipelineError, Result};
use csv::StringRecord;

pub use io::{read_csv, read_csv_from, write_csv, write_csv_to};

/// A table with named columns and string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<StringRecord>,
}

impl Dataset {
    /// Build a dataset; every row must have one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<StringRecord>) -> Result<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(PipelineError::DataError(format!(
                "row {} has {} fields, expected {}",
                i + 1,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column the caller cannot work without.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            PipelineError::DataError(format!(
                "required column '{}' is missing (found: {})",
                name,
                self.columns.join(", ")
            ))
        })
    }

    /// Cells of a column as text.
    pub fn text_column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Cells of a column parsed as numbers; empty/unparseable cells are `None`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| parse_number(&row[idx])).collect())
    }

    /// Distinct values of a column in first-seen order.
    pub fn distinct(&self, name: &str) -> Result<Vec<&str>> {
        let mut seen = Vec::new();
        for value in self.text_column(name)? {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    /// Keep rows for which `keep(index, row)` is true, preserving order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, &StringRecord) -> bool,
    {
        let mut index = 0;
        self.rows.retain(|row| {
            let kept = keep(index, row);
            index += 1;
            kept
        });
    }

    /// Rewrite every cell of column `name` through `f`.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&str) -> String,
    {
        let idx = self.require_column(name)?;
        for row in &mut self.rows {
            let rebuilt: StringRecord = row
                .iter()
                .enumerate()
                .map(|(i, cell)| if i == idx { f(cell) } else { cell.to_string() })
                .collect();
            *row = rebuilt;
        }
        Ok(())
    }
}

/// Parse a numeric cell; surrounding whitespace is ignored and NaN reads as missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
