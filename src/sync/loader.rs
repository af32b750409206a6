//! CSV loading for employee records.
//!
//! The whole file is read into memory. Every data row is mapped by header
//! name into a [`RawRow`] and passed through [`validation::validate`]; rows
//! whose cell count differs from the header, or that fail validation, are
//! logged and left out of the result. Only failures to open or
//! read the file abort the load.

use crate::error::{SyncError, SyncResult};
use crate::models::{EmployeeRecord, RawRow};
use crate::sync::validation::{self, Rejection};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Records accepted from a file, plus the rows that were turned away.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<EmployeeRecord>,
    /// (1-based data row number, reason)
    pub rejections: Vec<(u64, Rejection)>,
}

/// Load and validate every row of the CSV file at `path`.
pub fn load(path: impl AsRef<Path>) -> SyncResult<Vec<EmployeeRecord>> {
    load_with_report(path).map(|outcome| outcome.records)
}

/// Like [`load`], also returning each rejected row with its reason.
pub fn load_with_report(path: impl AsRef<Path>) -> SyncResult<LoadOutcome> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(SyncError::InvalidArgument("path must not be empty".into()));
    }

    let file = File::open(path).map_err(|e| SyncError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| SyncError::from_csv(path, e))?
        .clone();

    let mut outcome = LoadOutcome::default();
    let mut record = StringRecord::new();
    let mut row_number = 0u64;

    loop {
        let raw = match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                row_number += 1;
                if record.len() != headers.len() {
                    reject(
                        &mut outcome,
                        row_number,
                        Rejection::CellCount {
                            expected: headers.len(),
                            found: record.len(),
                        },
                    );
                    continue;
                }
                to_raw_row(row_number, &headers, &record)
            }
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(SyncError::from_csv(path, err));
            }
            Err(err) => {
                row_number += 1;
                reject(
                    &mut outcome,
                    row_number,
                    Rejection::MalformedRow {
                        message: err.to_string(),
                    },
                );
                continue;
            }
        };

        match validation::validate(&raw) {
            Ok(employee) => outcome.records.push(employee),
            Err(rejection) => reject(&mut outcome, row_number, rejection),
        }
    }

    log::info!(
        "loaded {} records from {} ({} rejected)",
        outcome.records.len(),
        path.display(),
        outcome.rejections.len()
    );

    Ok(outcome)
}

fn to_raw_row(row_number: u64, headers: &StringRecord, record: &StringRecord) -> RawRow {
    let values: HashMap<String, String> = headers
        .iter()
        .zip(record.iter())
        .map(|(header, value)| (header.to_string(), value.to_string()))
        .collect();
    RawRow::new(row_number, values)
}

fn reject(outcome: &mut LoadOutcome, row_number: u64, rejection: Rejection) {
    log::warn!("rejected row {}: {}", row_number, rejection);
    outcome.rejections.push((row_number, rejection));
}
