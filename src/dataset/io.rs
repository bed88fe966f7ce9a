//! CSV reading and writing for datasets.

use super::Dataset;
use crate::error::{PipelineError, Result};
use crate::fs::atomic_write;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Load a dataset from a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| {
        PipelineError::DataError(format!("failed to open '{}': {}", path.display(), e))
    })?;
    read_csv_from(file).map_err(|e| match e {
        PipelineError::DataError(msg) => {
            PipelineError::DataError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Load a dataset from any reader producing CSV with a header row.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(str::to_string)
        .collect();

    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(PipelineError::DataError(
            "CSV has no header row".to_string(),
        ));
    }

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(malformed)?;

    Dataset::new(columns, rows)
}

/// Serialize a dataset as CSV (header first, `\n` line endings).
pub fn write_csv_to<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(dataset.columns()).map_err(write_failed)?;
    for row in dataset.rows() {
        writer.write_record(row).map_err(write_failed)?;
    }
    writer.flush().map_err(|e| write_failed(e.into()))
}

/// Write a dataset to `path` atomically.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    write_csv_to(dataset, &mut buffer)?;
    atomic_write(path, &buffer).map_err(|e| {
        PipelineError::DataError(format!("failed to write '{}': {}", path.display(), e))
    })
}

fn malformed(e: csv::Error) -> PipelineError {
    match e.position() {
        Some(pos) => PipelineError::DataError(format!(
            "malformed CSV at line {}: {}",
            pos.line(),
            e
        )),
        None => PipelineError::DataError(format!("malformed CSV: {}", e)),
    }
}

fn write_failed(e: csv::Error) -> PipelineError {
    PipelineError::DataError(format!("failed to write CSV: {}", e))
}
