use std::collections::HashMap;
use std::fmt;

/// A validated employee row, ready to be written to the `employee` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmployeeRecord {
    #[sqlx(rename = "e_id")]
    pub id: i64,
    #[sqlx(rename = "e_name")]
    pub name: String,
    #[sqlx(rename = "e_designation")]
    pub designation: String,
    #[sqlx(rename = "e_addr")]
    pub address: String,
    #[sqlx(rename = "e_branch")]
    pub branch: String,
    #[sqlx(rename = "e_cont_no")]
    pub contact_number: i64,
}

/// Schema fields of an employee row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Designation,
    Address,
    Branch,
    ContactNumber,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Name,
        Field::Designation,
        Field::Address,
        Field::Branch,
        Field::ContactNumber,
    ];

    /// Header name used in the source CSV.
    pub fn header(self) -> &'static str {
        match self {
            Field::Id => "E_ID",
            Field::Name => "E_NAME",
            Field::Designation => "E_DESIGNATION",
            Field::Address => "E_ADDR",
            Field::Branch => "E_BRANCH",
            Field::ContactNumber => "E_CONT_NO",
        }
    }

    /// Column name in the `employee` table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "e_id",
            Field::Name => "e_name",
            Field::Designation => "e_designation",
            Field::Address => "e_addr",
            Field::Branch => "e_branch",
            Field::ContactNumber => "e_cont_no",
        }
    }

    /// Maximum character length for text fields, `None` for integer fields.
    pub fn max_len(self) -> Option<usize> {
        match self {
            Field::Name => Some(30),
            Field::Designation => Some(40),
            Field::Address => Some(100),
            Field::Branch => Some(15),
            Field::Id | Field::ContactNumber => None,
        }
    }

    pub fn constraint(self) -> String {
        match self.max_len() {
            Some(max) => format!("text of at most {max} characters"),
            None => "integer".to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// An unvalidated CSV row: header name to raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data row number (the header line is not counted).
    pub row_number: u64,
    pub values: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row_number: u64, values: HashMap<String, String>) -> Self {
        Self { row_number, values }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(field.header()).map(String::as_str)
    }
}
