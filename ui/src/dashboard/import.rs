//! Parsing of user-selected files into raw records.

use serde_json::Value;

use crate::core::csv::parse_csv;
use crate::core::error::{AppError, Result};
use crate::records::schema::from_csv_row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Json,
    Csv,
}

impl UploadKind {
    /// Picks the parser from the file name; anything else is unsupported.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".json") {
            Ok(Self::Json)
        } else if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else {
            Err(AppError::UnsupportedFormat(name.to_string()))
        }
    }
}

/// Raw records from an uploaded file, ready for normalization.
pub fn parse_upload(name: &str, contents: &str) -> Result<Vec<Value>> {
    let records = match UploadKind::from_name(name)? {
        UploadKind::Json => parse_json(contents)?,
        UploadKind::Csv => parse_csv_records(contents),
    };
    if records.is_empty() {
        return Err(AppError::EmptyImport);
    }
    Ok(records)
}

fn parse_json(contents: &str) -> Result<Vec<Value>> {
    let mut document: Value = serde_json::from_str(contents)?;
    if let Some(inner) = document
        .as_object_mut()
        .and_then(|object| object.remove("ambiti_territoriali"))
    {
        document = inner;
    }
    Ok(match document {
        Value::Array(items) => items,
        other => vec![other],
    })
}

fn parse_csv_records(contents: &str) -> Vec<Value> {
    parse_csv(contents).into_iter().map(from_csv_row).collect()
}
