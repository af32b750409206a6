//! Row validation shared by the loader and the synchronizer.
//!
//! `validate` turns a [`RawRow`] into an [`EmployeeRecord`] or a structured
//! [`Rejection`]. `check_record` holds the length rules and is the only place
//! they are enforced, so load-time and sync-time checks cannot drift apart.
//!
//! Text fields only carry an upper bound. An empty string is a valid name,
//! designation, address or branch.

use crate::models::{EmployeeRecord, Field, RawRow};
use thiserror::Error;

/// Why a row was excluded from the load or skipped during sync.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("missing field {field} (expected {})", .field.constraint())]
    MissingField { field: Field },
    #[error("field {field} expected integer, got `{value}`")]
    NotInteger { field: Field, value: String },
    #[error("field {field} expected at most {max} characters, got {actual}")]
    TooLong {
        field: Field,
        max: usize,
        actual: usize,
    },
    #[error("row has {found} cells, header has {expected}")]
    CellCount { expected: usize, found: usize },
    #[error("malformed row: {message}")]
    MalformedRow { message: String },
}

impl Rejection {
    /// The offending field, if the rejection is tied to one.
    pub fn field(&self) -> Option<Field> {
        match self {
            Rejection::MissingField { field }
            | Rejection::NotInteger { field, .. }
            | Rejection::TooLong { field, .. } => Some(*field),
            Rejection::CellCount { .. } | Rejection::MalformedRow { .. } => None,
        }
    }
}

/// Coerce and validate a raw row. All-or-nothing: any failing field rejects
/// the whole row.
pub fn validate(raw: &RawRow) -> Result<EmployeeRecord, Rejection> {
    let record = EmployeeRecord {
        id: integer_field(raw, Field::Id)?,
        name: text_field(raw, Field::Name)?,
        designation: text_field(raw, Field::Designation)?,
        address: text_field(raw, Field::Address)?,
        branch: text_field(raw, Field::Branch)?,
        contact_number: integer_field(raw, Field::ContactNumber)?,
    };

    check_record(&record)?;
    Ok(record)
}

/// Check the length bounds of an already typed record.
pub fn check_record(record: &EmployeeRecord) -> Result<(), Rejection> {
    check_len(Field::Name, &record.name)?;
    check_len(Field::Designation, &record.designation)?;
    check_len(Field::Address, &record.address)?;
    check_len(Field::Branch, &record.branch)?;
    Ok(())
}

fn check_len(field: Field, value: &str) -> Result<(), Rejection> {
    let Some(max) = field.max_len() else {
        return Ok(());
    };

    // VARCHAR(n) counts characters, not bytes
    let actual = value.chars().count();
    if actual > max {
        return Err(Rejection::TooLong { field, max, actual });
    }
    Ok(())
}

fn lookup(raw: &RawRow, field: Field) -> Result<&str, Rejection> {
    raw.get(field).ok_or(Rejection::MissingField { field })
}

fn text_field(raw: &RawRow, field: Field) -> Result<String, Rejection> {
    lookup(raw, field).map(str::to_string)
}

fn integer_field(raw: &RawRow, field: Field) -> Result<i64, Rejection> {
    let value = lookup(raw, field)?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Rejection::NotInteger {
            field,
            value: value.to_string(),
        })
}
